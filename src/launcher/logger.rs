// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Logging side channel provided by the launcher host

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

/// Fire-and-forget sink for helper activity
pub trait Logger: Send + Sync {
    /// Report a message with an optional structured payload
    fn log(&self, message: &str, payload: Option<&Value>);
}

/// Logger forwarding to `tracing`
#[derive(Debug, Clone)]
pub struct TracingLogger {
    launcher: String,
}

impl TracingLogger {
    /// Create a logger tagging every event with the launcher name
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn log(&self, message: &str, payload: Option<&Value>) {
        match payload {
            Some(payload) => {
                tracing::info!(launcher = %self.launcher, payload = %payload, "{}", message)
            }
            None => tracing::info!(launcher = %self.launcher, "{}", message),
        }
    }
}

/// Logged message
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub message: String,
    pub payload: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Logger keeping entries in memory, like a captured console
#[derive(Debug, Clone)]
pub struct BufferedLogger {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    max_entries: usize,
}

impl Default for BufferedLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedLogger {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries: 1000,
        }
    }

    /// Set the number of entries kept; older entries are dropped first.
    /// Zero keeps nothing.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Snapshot of all entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// Messages only
    pub fn messages(&self) -> Vec<String> {
        self.entries.read().iter().map(|e| e.message.clone()).collect()
    }

    /// Check if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.read().iter().any(|e| e.message.contains(needle))
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Logger for BufferedLogger {
    fn log(&self, message: &str, payload: Option<&Value>) {
        if self.max_entries == 0 {
            return;
        }

        let mut entries = self.entries.write();
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            message: message.to_string(),
            payload: payload.cloned(),
            timestamp: Utc::now(),
        });
    }
}
