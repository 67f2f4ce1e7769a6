//! Command-line interface definition for Hearth
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for message routing, routing history, meal planning,
//! grocery lists and recipe swaps.

use crate::planner::Weekday;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hearth - household assistant routing and meal planning
///
/// Decides which assistant bot a message belongs to and plans the week's
/// dinners from a recipe catalog.
#[derive(Parser, Debug, Clone)]
#[command(name = "hearth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "HEARTH_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the data directory used by the document store
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Hearth
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Classify a message and report whether it reached the right bot
    Route {
        /// Session key the message arrived on
        session_key: String,

        /// Message text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Do not append to the routing history
        #[arg(long)]
        no_history: bool,
    },

    /// Show what the bot behind a session key helps with
    Awareness {
        /// Session key to describe
        session_key: String,
    },

    /// Show recent routing history
    History {
        /// Show a single context's log instead of the central log
        #[arg(long)]
        context: Option<String>,

        /// Maximum number of entries to show, newest last
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Generate a weekly dinner plan
    Plan {
        /// Plan from the first configured start day on or after this date
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Seed for reproducible plans
        #[arg(long)]
        seed: Option<u64>,

        /// Record recipe usage in the catalog
        #[arg(long)]
        commit: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the grocery list for the saved plan
    Groceries {
        /// Convert imperial units to metric
        #[arg(long)]
        metric: bool,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List swap options for a day, or swap in a recipe
    Swap {
        /// Day of the saved plan (e.g. "tuesday" or "tue")
        day: Weekday,

        /// Recipe id to put on that day
        #[arg(long)]
        recipe: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            data_dir: None,
            command: Commands::History {
                context: None,
                limit: 20,
            },
        }
    }
}
