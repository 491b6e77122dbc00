// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request header interception
//!
//! Requests assign headers through a setter shared by every request of a
//! prototype. Watches patch that setter to capture a single header value.

mod header_watch;
mod xhr;

pub use header_watch::{install_header_watch, HeaderObserver, HeaderWatch, WatchState};
pub use xhr::{
    native_set_request_header, HeaderSetter, ReadyState, XhrPrototype, XhrResponse,
    XmlHttpRequest,
};

/// Header carrying credentials, watched by the authorization shortcut
pub const AUTHORIZATION: &str = "Authorization";
