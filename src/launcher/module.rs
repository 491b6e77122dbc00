// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module registry
//!
//! A module is activated as soon as it is added and deactivated when it is
//! removed. Deactivation only takes away what the module exposed in the
//! namespace; anything it patched on shared objects stays patched.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::config::LauncherConfig;
use super::logger::Logger;
use super::namespace::Namespace;
use crate::error::{Error, Result};

/// A unit of functionality with activate/deactivate hooks
pub trait Module: Send + Sync {
    /// Install the module's surface
    fn activate(&self, launcher: &Launcher) -> Result<()>;

    /// Remove the module's surface
    fn deactivate(&self, launcher: &Launcher) -> Result<()>;
}

/// Registry of active modules sharing one namespace and logger
pub struct Launcher {
    config: LauncherConfig,
    logger: Arc<dyn Logger>,
    namespace: Arc<Namespace>,
    modules: DashMap<String, Arc<dyn Module>>,
}

impl Launcher {
    /// Create a launcher; the namespace is named after `config.name`
    pub fn new(config: LauncherConfig, logger: Arc<dyn Logger>) -> Result<Self> {
        config.validate()?;
        let namespace = Arc::new(Namespace::new(config.name.clone()));

        Ok(Self {
            config,
            logger,
            namespace,
            modules: DashMap::new(),
        })
    }

    /// Host configuration
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Host logger
    pub fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }

    /// Namespace modules install into
    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    /// Add and activate `module` under `name`.
    ///
    /// The module is registered only if activation succeeds.
    pub fn add_module<M: Module + 'static>(&self, name: &str, module: M) -> Result<()> {
        if self.modules.contains_key(name) {
            return Err(Error::InvalidState(format!("module '{}' is already added", name)));
        }

        let module: Arc<dyn Module> = Arc::new(module);
        module.activate(self)?;
        self.modules.insert(name.to_string(), module);

        tracing::info!(launcher = %self.config.name, module = %name, "Module activated");
        Ok(())
    }

    /// Deactivate and remove the module under `name`; returns whether it existed
    pub fn remove_module(&self, name: &str) -> Result<bool> {
        let Some((_, module)) = self.modules.remove(name) else {
            return Ok(false);
        };

        module.deactivate(self)?;

        tracing::info!(launcher = %self.config.name, module = %name, "Module deactivated");
        Ok(true)
    }

    /// Check if a module is active under `name`
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Names of active modules, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("config", &self.config)
            .field("namespace", &self.namespace)
            .field("modules", &self.module_names())
            .finish()
    }
}
