// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Launcher configuration

use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration handed over by the launcher host
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Name of the namespace modules install into
    pub name: String,
    /// Header captured by `intercept_authorization_header`
    pub auth_header: String,
    /// Byte quota of each storage area (None = unlimited)
    pub storage_quota: Option<usize>,
    /// Document URL used by cookie and query helpers
    pub document_url: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            name: "launcher".to_string(),
            auth_header: crate::network::AUTHORIZATION.to_string(),
            storage_quota: None,
            document_url: "http://localhost/".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Create a config with the given namespace name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a host-provided JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the header watched by the authorization shortcut
    pub fn auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = header.into();
        self
    }

    /// Limit each storage area to `bytes`
    pub fn storage_quota(mut self, bytes: usize) -> Self {
        self.storage_quota = Some(bytes);
        self
    }

    /// Set the document URL
    pub fn document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = url.into();
        self
    }

    /// Check that the config can be used
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("launcher name must not be empty".to_string()));
        }
        if self.auth_header.is_empty() {
            return Err(Error::Config("auth header must not be empty".to_string()));
        }
        url::Url::parse(&self.document_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LauncherConfig::new("scout")
            .auth_header("X-Api-Key")
            .document_url("https://app.example.com/");

        assert_eq!(config.name, "scout");
        assert_eq!(config.auth_header, "X-Api-Key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = LauncherConfig::from_json(r#"{"name": "scout"}"#).unwrap();
        assert_eq!(config.name, "scout");
        assert_eq!(config.auth_header, "Authorization");
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = LauncherConfig::from_json(r#"{"name": " "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
