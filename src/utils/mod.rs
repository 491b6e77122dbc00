// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Stateless helpers exposed next to the hook engine
//!
//! Storage wrappers recover from bad data and log it. Token decoding fails
//! loudly instead.

pub mod cookies;
pub mod csp;
pub mod jwt;
pub mod query;
pub mod storage;

pub use cookies::{Cookie, CookieJar, DocumentCookies};
pub use csp::{extract_csp_from_html, nonce_from_html, nonce_from_policy};
pub use jwt::decode_payload;
pub use query::{query_params, query_variable, query_variable_from_location};
pub use storage::{JsonStorage, StorageArea, StorageKind};
