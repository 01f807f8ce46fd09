//! Session builder for fluent startup configuration
//!
//! Startup runs in a fixed order: parameter extraction, tile parameter
//! setup, plugin registration and finally the `iitcLoaded` hook. A missing
//! version token stops it after the first step.

use crate::{
    core::{config::IntelConfig, session::Session},
    extract::{extractor::report_fatal, extract_parameters, SymbolTable},
    notify::{LogNotifier, Notifier},
    plugins::{events, HookBus, PluginTrait},
    tiles::{TileParams, TileResolver},
    Result,
};
use serde_json::json;
use std::sync::Arc;

/// Builder for creating and starting a [`Session`]
pub struct SessionBuilder {
    config: IntelConfig,
    symbols: SymbolTable,
    notifier: Arc<dyn Notifier>,
    plugins: Vec<Box<dyn PluginTrait>>,
}

impl SessionBuilder {
    /// Create a new SessionBuilder with default settings
    pub fn new() -> Self {
        Self {
            config: IntelConfig::default(),
            symbols: SymbolTable::new(),
            notifier: Arc::new(LogNotifier),
            plugins: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: IntelConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host globals to extract parameters from
    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Add a plugin, registered before `iitcLoaded` fires
    pub fn with_plugin(mut self, plugin: Box<dyn PluginTrait>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Run startup. Fails with a fatal error if the version token is missing
    /// or the configured one is malformed.
    pub fn build(self) -> Result<Session> {
        if let Err(e) = self.config.validate() {
            if e.is_fatal() {
                report_fatal(self.notifier.as_ref(), &e);
            }
            return Err(e);
        }

        let runtime = extract_parameters(&self.symbols, &self.config, self.notifier.as_ref())?;
        log::info!("extracted CURRENT_VERSION {}", runtime.current_version);

        let params = TileParams::initialize(&runtime, self.notifier.as_ref());
        let resolver = TileResolver::new(params, &self.config);
        resolver.log_zoom_parameters();

        let mut session = Session::new(self.config, runtime, resolver, HookBus::new(), self.notifier);
        for plugin in self.plugins {
            let name = plugin.name().to_string();
            // a broken plugin must not take startup down with it
            if let Err(e) = session.add_plugin(plugin) {
                log::error!("error starting plugin {}: {}", name, e);
            }
        }

        session.hooks().run_hooks(
            events::IITC_LOADED,
            &json!({ "version": session.runtime().current_version }),
        );
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
