// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Koukku - Runtime Hooks for Launcher Modules
//!
//! Method hooking and one-shot header interception for modules running in a
//! browser launcher, plus the small helper surface those modules share.
//!
//! ## Features
//!
//! - Hook engine: observe results and arguments of any method, sync or deferred
//! - Header watch: capture the first assignment of a request header, then step aside
//! - Launcher modules: activate/deactivate surfaces in a host namespace
//! - Helpers: cookies, JSON storage with logging, URL queries, JWT payloads, CSP nonces
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use koukku::{Launcher, LauncherConfig, TracingLogger, Utils, UtilsModule, XmlHttpRequest};
//!
//! fn main() -> koukku::Result<()> {
//!     let config = LauncherConfig::new("scout");
//!     let launcher = Launcher::new(config, Arc::new(TracingLogger::new("scout")))?;
//!     launcher.add_module("utils", UtilsModule::new())?;
//!
//!     if let Some(utils) = launcher.namespace().get::<Utils>("utils") {
//!         utils.intercept_authorization_header();
//!     }
//!
//!     let xhr = XmlHttpRequest::new();
//!     xhr.open("GET", "https://api.example.com/me")?;
//!     xhr.set_request_header("Authorization", "Bearer token")?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod hook;
pub mod launcher;
pub mod network;
pub mod slot;
pub mod utils;

// Re-exports for convenience

// Errors
pub use error::{Error, ErrorContext, Result};

// Override slots
pub use slot::{Generation, OverrideSlot};

// Hook engine
pub use hook::{install_hook, HookBinding, HostObject, JsValue, MethodTable, Observer, Outcome};

// Header interception
pub use network::{install_header_watch, HeaderWatch, WatchState, XhrPrototype, XmlHttpRequest};

// Launcher
pub use launcher::{
    BufferedLogger, Launcher, LauncherConfig, Logger, Module, Namespace, TracingLogger,
};
pub use launcher::{Utils, UtilsModule};

// Helpers
pub use utils::{Cookie, CookieJar, DocumentCookies, JsonStorage, StorageArea, StorageKind};

/// Koukku version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
