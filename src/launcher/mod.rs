// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Launcher integration
//!
//! The launcher host owns a namespace and a logger. Modules are activated
//! into the namespace when added; [`UtilsModule`] exposes the [`Utils`]
//! surface there under `"utils"`.

pub mod config;
pub mod logger;
pub mod module;
pub mod namespace;
pub mod surface;

pub use config::LauncherConfig;
pub use logger::{BufferedLogger, LogEntry, Logger, TracingLogger};
pub use module::{Launcher, Module};
pub use namespace::Namespace;
pub use surface::{Utils, UtilsModule, UTILS_KEY};
