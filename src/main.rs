//! Hearth - household assistant routing and meal planning CLI
//!
#![doc = "Hearth - household assistant routing and meal planning CLI"]
#![doc = "Main entry point for the Hearth command-line application."]

use anyhow::Result;

use hearth::cli::{Cli, Commands};
use hearth::commands;
use hearth::config::Config;
use hearth::logging::init_logging;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_logging(&config.logging)?;

    // Execute command
    match cli.command {
        Commands::Route {
            session_key,
            message,
            json,
            no_history,
        } => {
            tracing::debug!("Routing message for session {}", session_key);
            let message = message.join(" ");
            commands::route::run_route(&config, &session_key, &message, json, no_history)?;
            Ok(())
        }
        Commands::Awareness { session_key } => {
            commands::route::run_awareness(&config, &session_key)?;
            Ok(())
        }
        Commands::History { context, limit } => {
            commands::history::run_history(&config, context.as_deref(), limit)?;
            Ok(())
        }
        Commands::Plan {
            start,
            seed,
            commit,
            json,
        } => {
            tracing::debug!("Generating weekly plan");
            commands::plan::run_plan(&config, start, seed, commit, json)?;
            Ok(())
        }
        Commands::Groceries { metric, json } => {
            commands::plan::run_groceries(&config, metric, json)?;
            Ok(())
        }
        Commands::Swap { day, recipe } => {
            commands::plan::run_swap(&config, day, recipe.as_deref())?;
            Ok(())
        }
    }
}
