// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! localStorage / sessionStorage wrappers
//!
//! [`StorageArea`] is the raw string store a page sees. [`JsonStorage`] sits
//! on top of it, stores values as JSON and reports every operation to the
//! launcher logger. Failures (unserializable values, unparsable stored data,
//! quota exhaustion) are logged and swallowed; callers never see them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::launcher::Logger;

/// Which storage area a wrapper talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Survives the session
    Local,
    /// Cleared with the session
    Session,
}

impl StorageKind {
    /// Name used in log messages
    pub fn label(&self) -> &'static str {
        match self {
            StorageKind::Local => "localStorage",
            StorageKind::Session => "sessionStorage",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw string key-value storage
#[derive(Debug, Clone, Default)]
pub struct StorageArea {
    data: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total size of keys and values in bytes
    quota: Option<usize>,
}

impl StorageArea {
    /// Create an unlimited area
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an area holding at most `bytes` of keys and values
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            quota: Some(bytes),
        }
    }

    /// Stored string for `key`
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Store `value` under `key`
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write();
        if let Some(quota) = self.quota {
            let used: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(Error::other(format!(
                    "QuotaExceededError: setting '{}' exceeds {} bytes",
                    key, quota
                )));
            }
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove `key`
    pub fn remove_item(&self, key: &str) {
        self.data.write().remove(key);
    }

    /// Remove every key
    pub fn clear(&self) {
        self.data.write().clear();
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON-valued, logging wrapper around a storage area
#[derive(Clone)]
pub struct JsonStorage {
    kind: StorageKind,
    area: StorageArea,
    logger: Arc<dyn Logger>,
}

impl JsonStorage {
    /// Wrap `area`, reporting to `logger`
    pub fn new(kind: StorageKind, area: StorageArea, logger: Arc<dyn Logger>) -> Self {
        Self { kind, area, logger }
    }

    /// Which area this wraps
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Underlying raw area
    pub fn area(&self) -> &StorageArea {
        &self.area
    }

    /// Serialize `value` to JSON and store it under `key`
    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(Error::from)
            .and_then(|json| self.area.set_item(key, &json).map(|_| json));

        match result {
            Ok(json) => self.log(format!("{}: Set {} = {}", self.kind, key, json)),
            Err(e) => self.log(format!("{}: Error setting {}: {}", self.kind, key, e)),
        }
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Missing keys and unparsable data both yield `None`; the latter is logged
    /// as an error.
    pub fn get_item<T: DeserializeOwned + Serialize>(&self, key: &str) -> Option<T> {
        let Some(raw) = self.area.get_item(key) else {
            self.log(format!("{}: Get {} = null", self.kind, key));
            return None;
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                let shown = serde_json::to_string(&value).unwrap_or(raw);
                self.log(format!("{}: Get {} = {}", self.kind, key, shown));
                Some(value)
            }
            Err(e) => {
                self.log(format!("{}: Error getting {}: {}", self.kind, key, e));
                None
            }
        }
    }

    /// Read the value under `key` as untyped JSON
    pub fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        self.get_item::<serde_json::Value>(key)
    }

    /// Remove `key`
    pub fn remove_item(&self, key: &str) {
        self.area.remove_item(key);
        self.log(format!("{}: Removed {}", self.kind, key));
    }

    /// Remove every key
    pub fn clear(&self) {
        self.area.clear();
        self.log(format!("{}: Cleared all data", self.kind));
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.area.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
    }

    fn log(&self, message: String) {
        self.logger.log(&message, None);
    }
}

impl fmt::Debug for JsonStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStorage")
            .field("kind", &self.kind)
            .field("len", &self.area.len())
            .finish()
    }
}
