// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hook engine
//!
//! Wraps methods of host objects so their results can be observed without
//! changing what callers see.

mod engine;
mod object;
mod outcome;
mod value;

pub use engine::{install_hook, HookBinding, Observer};
pub use object::{HostObject, Method, MethodSlot, MethodTable};
pub use outcome::{Deferred, Outcome};
pub use value::JsValue;
