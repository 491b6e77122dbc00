// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Method hooking
//!
//! `install_hook` replaces a method with a wrapper that calls whatever the
//! slot held before and hands the completed result to an observer along
//! with the arguments. The result itself is returned untouched.
//!
//! - errors from the wrapped method propagate and the observer is skipped
//! - ready results are observed on the calling stack
//! - deferred results are observed after they resolve, inside the deferred
//!   value handed back to the caller
//!
//! Hooking an already hooked method wraps the previous wrapper, so observers
//! fire innermost first and the true original still runs once per call.

use std::fmt;
use std::sync::Arc;

use super::object::{Method, MethodSlot, MethodTable};
use super::outcome::Outcome;
use super::value::JsValue;
use crate::error::{Error, Result};
use crate::slot::Generation;

/// Callback receiving `(result, arguments)` of every completed invocation
pub type Observer = Arc<dyn Fn(&JsValue, &[JsValue]) -> Result<()> + Send + Sync>;

/// Handle describing one installed hook
pub struct HookBinding<R> {
    /// Slot the wrapper was installed into
    target: MethodSlot<R>,
    /// Name of the wrapped method
    method_name: String,
    /// Generation of the wrapper in the slot
    generation: Generation,
    /// Whether the slot held a callable when the hook was installed
    had_original: bool,
}

impl<R> HookBinding<R> {
    /// Name of the wrapped method
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Generation of the wrapper in its slot
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether there was a method to wrap
    pub fn had_original(&self) -> bool {
        self.had_original
    }

    /// Whether this wrapper is still the outermost layer of the method
    pub fn is_outermost(&self) -> bool {
        self.target.generation() == self.generation
    }
}

impl<R> fmt::Debug for HookBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("method_name", &self.method_name)
            .field("generation", &self.generation)
            .field("had_original", &self.had_original)
            .finish()
    }
}

/// Wrap `method_name` on `target` with `observer`.
///
/// The current implementation is captured when the hook is installed. If the
/// name resolves to nothing, the wrapper is still installed and every call to
/// it fails with [`Error::NotCallable`].
pub fn install_hook<R, F>(
    target: &MethodTable<R>,
    method_name: &str,
    observer: F,
) -> HookBinding<R>
where
    R: 'static,
    F: Fn(&JsValue, &[JsValue]) -> Result<()> + Send + Sync + 'static,
{
    let observer: Observer = Arc::new(observer);
    let slot = target.slot(method_name);

    let (generation, had_original) = slot.wrap(|original, _| {
        let had_original = original.is_some();
        let wrapper = wrap_method(method_name.to_string(), original, observer);
        (Some(wrapper), had_original)
    });

    tracing::debug!(
        method = %method_name,
        generation,
        had_original,
        "Hook installed"
    );

    HookBinding {
        target: slot,
        method_name: method_name.to_string(),
        generation,
        had_original,
    }
}

fn wrap_method<R: 'static>(
    method_name: String,
    original: Option<Method<R>>,
    observer: Observer,
) -> Method<R> {
    Arc::new(move |receiver: &R, args: &[JsValue]| -> Result<Outcome> {
        let original = original
            .as_ref()
            .ok_or_else(|| Error::not_callable(method_name.as_str()))?;

        match original(receiver, args)? {
            Outcome::Ready(value) => {
                observer(&value, args)?;
                Ok(Outcome::Ready(value))
            }
            Outcome::Deferred(pending) => {
                let observer = observer.clone();
                let args = args.to_vec();
                Ok(Outcome::deferred(async move {
                    let value = pending.await?;
                    observer(&value, &args)?;
                    Ok(value)
                }))
            }
        }
    })
}
