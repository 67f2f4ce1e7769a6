//! Hearth - household assistant routing and meal planning library
//!
//! This library provides two independent rule engines used by a family of
//! chat assistant bots: a keyword classifier that detects messages sent to
//! the wrong bot, and a weekly dinner planner with category, cooking time
//! and favorite rules.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `routing`: Context registry, message classification, history logs and responses
//! - `planner`: Recipes, planner rules, plan generation, swaps and grocery lists
//! - `matching`: Keyword and regex matching shared by both engines
//! - `storage`: Document store abstraction with JSON file, sled and memory backends
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use hearth::routing::{ContextRegistry, HistoryLimits, HistoryLog, Router};
//! use hearth::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = ContextRegistry::load("data/session-manager.json")?;
//!     let history = HistoryLog::new(Arc::new(MemoryStore::new()), HistoryLimits::default());
//!     let router = Router::new(registry, history);
//!
//!     let outcome = router.route("agent:main:telegram:work:dm:1", "What's for dinner?")?;
//!     println!("misrouted: {}", outcome.classification.is_misrouted);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod matching;
pub mod planner;
pub mod routing;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{HearthError, Result};
pub use planner::{generate_weekly_plan, PlannerRules, RecipeCatalog, WeeklyPlan};
pub use routing::{classify, ClassificationResult, ContextRegistry, Router};

#[cfg(test)]
pub mod test_utils;
