//! Command handlers for the Hearth CLI
//!
//! Each handler takes the loaded configuration, builds the pieces it needs
//! (registry, store, catalog) and prints its result to stdout.

pub mod history;
pub mod plan;
pub mod route;

use crate::config::Config;
use crate::routing::{ContextRegistry, HistoryLimits, HistoryLog, Router};
use crate::storage::{open_store, SharedStore};

/// Open the configured document store
pub fn store_from_config(config: &Config) -> crate::error::Result<SharedStore> {
    open_store(&config.storage)
}

/// History log over the configured store
pub fn history_from_config(config: &Config) -> crate::error::Result<HistoryLog> {
    Ok(HistoryLog::new(
        store_from_config(config)?,
        HistoryLimits::from(&config.routing),
    ))
}

/// Router with the configured registry and history log
pub fn router_from_config(config: &Config) -> crate::error::Result<Router> {
    let registry = ContextRegistry::load(&config.routing.session_manager_path)?;
    Ok(Router::new(registry, history_from_config(config)?))
}
