// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host objects and their patchable method tables

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use super::outcome::Outcome;
use super::value::JsValue;
use crate::error::{Error, Result};
use crate::slot::OverrideSlot;

/// Callable stored in a method slot.
///
/// Receives the call-time receiver and the positional arguments.
pub type Method<R> = Arc<dyn Fn(&R, &[JsValue]) -> Result<Outcome> + Send + Sync>;

/// Slot of a single named method. `None` means the name resolves to nothing.
pub type MethodSlot<R> = Arc<OverrideSlot<Option<Method<R>>>>;

/// Named methods shared by every receiver of type `R`
pub struct MethodTable<R> {
    slots: DashMap<String, MethodSlot<R>>,
}

impl<R> Default for MethodTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MethodTable<R> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Define (or redefine) a method
    pub fn define<F>(&self, name: &str, method: F)
    where
        F: Fn(&R, &[JsValue]) -> Result<Outcome> + Send + Sync + 'static,
    {
        let method: Method<R> = Arc::new(method);
        self.slot(name).set(Some(method));
    }

    /// Slot for `name`, created empty if the method was never defined
    pub fn slot(&self, name: &str) -> MethodSlot<R> {
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OverrideSlot::new(None)))
            .value()
            .clone()
    }

    /// Current implementation of `name`
    pub fn get(&self, name: &str) -> Option<Method<R>> {
        let slot = self.slots.get(name).map(|entry| entry.value().clone())?;
        slot.current()
    }

    /// Check if `name` currently resolves to something callable
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all slots, callable or not
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Invoke `name` on `receiver`
    pub fn invoke(&self, receiver: &R, name: &str, args: &[JsValue]) -> Result<Outcome> {
        let method = self.get(name).ok_or_else(|| Error::not_callable(name))?;
        method(receiver, args)
    }
}

impl<R> fmt::Debug for MethodTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.names())
            .finish()
    }
}

/// Object living in the host page, exposing properties and hookable methods
pub struct HostObject {
    /// Object name, used in logs
    name: String,
    /// Plain data properties
    properties: RwLock<HashMap<String, JsValue>>,
    /// Methods, invoked with this object as receiver
    methods: MethodTable<HostObject>,
}

impl HostObject {
    /// Create an empty object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: RwLock::new(HashMap::new()),
            methods: MethodTable::new(),
        }
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read a property, undefined when absent
    pub fn get(&self, key: &str) -> JsValue {
        self.properties.read().get(key).cloned().unwrap_or_default()
    }

    /// Write a property
    pub fn set(&self, key: impl Into<String>, value: impl Into<JsValue>) {
        self.properties.write().insert(key.into(), value.into());
    }

    /// Method table of this object
    pub fn methods(&self) -> &MethodTable<HostObject> {
        &self.methods
    }

    /// Define a method on this object
    pub fn define_method<F>(&self, name: &str, method: F) -> &Self
    where
        F: Fn(&HostObject, &[JsValue]) -> Result<Outcome> + Send + Sync + 'static,
    {
        self.methods.define(name, method);
        self
    }

    /// Call a method with this object as receiver
    pub fn call(&self, name: &str, args: &[JsValue]) -> Result<Outcome> {
        self.methods.invoke(self, name, args)
    }

    /// Call a method that is expected to answer synchronously
    pub fn call_sync(&self, name: &str, args: &[JsValue]) -> Result<JsValue> {
        self.call(name, args)?
            .into_ready()
            .ok_or_else(|| Error::Deferred {
                method: name.to_string(),
            })
    }

    /// Call a method and wait for its value, deferred or not
    pub async fn call_async(&self, name: &str, args: &[JsValue]) -> Result<JsValue> {
        self.call(name, args)?.resolve().await
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
