use crate::commands::router_from_config;
use crate::config::Config;
use crate::error::{HearthError, Result};
use crate::routing::{session_awareness, ContextRegistry, RoutingOutcome};
use colored::Colorize;

/// Route one message and print the outcome
pub fn run_route(
    config: &Config,
    session_key: &str,
    message: &str,
    json: bool,
    no_history: bool,
) -> Result<()> {
    let router = router_from_config(config)?;
    let outcome = if no_history {
        router.route_without_history(session_key, message)?
    } else {
        router.route(session_key, message)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(session_key, message, &outcome);
    }
    Ok(())
}

fn print_outcome(session_key: &str, message: &str, outcome: &RoutingOutcome) {
    let result = &outcome.classification;

    println!("{}", "Routing analysis".bold());
    println!("  Session:     {}", session_key);
    println!("  Message:     {}", crate::matching::preview(message, 100));
    println!("  Current:     {}", result.current_context.cyan());
    println!("  Recommended: {}", result.recommended_context.cyan());
    println!(
        "  Misrouted:   {}",
        if result.is_misrouted {
            "YES".red().bold()
        } else {
            "no".green()
        }
    );
    println!("  Score:       {} ({:?})", result.score, result.confidence);
    println!(
        "  Keywords:    {}",
        if result.matched_keywords.is_empty() {
            "none".to_string()
        } else {
            result.matched_keywords.join(", ")
        }
    );
    println!();

    match &outcome.misroute_response {
        Some(response) => println!("{}", response),
        None => println!("{}", "Message is routed to the right bot.".green()),
    }

    for recommendation in &outcome.recommendations {
        println!("{} {}", "→".yellow(), recommendation.message);
        println!("  {}", recommendation.action);
    }

    if let Some(error) = &outcome.history_error {
        println!("{} {}", "warning:".yellow().bold(), error);
    }
}

/// Print what the bot behind a session key helps with
pub fn run_awareness(config: &Config, session_key: &str) -> Result<()> {
    let registry = ContextRegistry::load(&config.routing.session_manager_path)?;
    let text = session_awareness(session_key, &registry)
        .ok_or_else(|| HearthError::UnknownSession(session_key.to_string()))?;
    println!("{}", text.trim());
    Ok(())
}
