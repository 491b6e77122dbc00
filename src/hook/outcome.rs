// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Result of invoking a host method
//!
//! A method either produces its value on the calling stack or hands back a
//! deferred value that resolves later. Hooks observe both through the same
//! type.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::value::JsValue;
use crate::error::Result;

/// Pending result of a deferred invocation
pub type Deferred = BoxFuture<'static, Result<JsValue>>;

/// What a method invocation returned
pub enum Outcome {
    /// Value produced synchronously
    Ready(JsValue),
    /// Value produced once the future resolves
    Deferred(Deferred),
}

impl Outcome {
    /// Synchronous result
    pub fn ready(value: impl Into<JsValue>) -> Self {
        Outcome::Ready(value.into())
    }

    /// Deferred result from any sendable future
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<JsValue>> + Send + 'static,
    {
        Outcome::Deferred(future.boxed())
    }

    /// Whether the value is still pending
    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }

    /// The value, if it was produced synchronously
    pub fn into_ready(self) -> Option<JsValue> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Deferred(_) => None,
        }
    }

    /// Wait for the value regardless of how it is produced
    pub async fn resolve(self) -> Result<JsValue> {
        match self {
            Outcome::Ready(value) => Ok(value),
            Outcome::Deferred(pending) => pending.await,
        }
    }
}

impl From<JsValue> for Outcome {
    fn from(value: JsValue) -> Self {
        Outcome::Ready(value)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
