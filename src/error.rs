//! Error types for Hearth
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Hearth operations
///
/// Covers routing lookups, planner preconditions, history persistence,
/// configuration loading and storage backends. Only `UnknownSession`,
/// `NoContextData` and `EmptyCatalog` are fatal to a routing or planning
/// call; `LogWrite` is reported and swallowed by the router.
#[derive(Error, Debug)]
pub enum HearthError {
    /// Session key is not present in the session mapping
    #[error("Unknown session key: {0}")]
    UnknownSession(String),

    /// Context is mapped but has no topic or keyword data
    #[error("No context data for: {0}")]
    NoContextData(String),

    /// Planner was called with an empty recipe catalog
    #[error("Recipe catalog is empty, cannot generate a plan")]
    EmptyCatalog,

    /// History log could not be written
    #[error("History log write failed: {0}")]
    LogWrite(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document store errors (backend open, read, write)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored document exists but is not valid JSON
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Recipe id not present in the catalog
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Plan day is missing or cannot hold a recipe
    #[error("Invalid plan day: {0}")]
    InvalidPlanDay(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Hearth operations
///
/// Uses `anyhow::Error` so callers get context chains; the concrete
/// `HearthError` kind can be recovered with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
