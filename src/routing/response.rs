//! User-facing text for routing results

use crate::routing::classifier::ClassificationResult;
use crate::routing::registry::{ContextRegistry, RegisteredContext};
use serde::{Deserialize, Serialize};

/// Kind of follow-up suggested to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Redirect,
}

/// Follow-up suggestion attached to a routing outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub action: String,
}

/// Wording for the built-in contexts
struct Profile {
    icon: &'static str,
    label: &'static str,
    area: &'static str,
    examples_of: &'static str,
    short: &'static str,
    helps_with: &'static str,
    sample_requests: &'static str,
}

fn builtin_profile(context: &str) -> Option<Profile> {
    let profile = match context {
        "home" => Profile {
            icon: "🏠",
            label: "Home",
            area: "home/family",
            examples_of: "recipes, shopping, or calendar",
            short: "Home",
            helps_with: "Recipes, shopping lists, meal planning, family calendar, home tasks",
            sample_requests:
                "\"Add milk to shopping list\", \"What's for dinner?\", \"Plan meals for week\"",
        },
        "work" => Profile {
            icon: "💼",
            label: "Work",
            area: "work/business",
            examples_of: "projects, emails, or scheduling",
            short: "Work",
            helps_with: "Projects, client communication, scheduling, business analytics",
            sample_requests:
                "\"Check project status\", \"Schedule meeting\", \"Send email to client\"",
        },
        "admin" => Profile {
            icon: "⚙️",
            label: "Admin",
            area: "technical/admin",
            examples_of: "development, configuration, or system management",
            short: "Technical",
            helps_with: "Development, bot management, system configuration, debugging",
            sample_requests: "\"Check bot status\", \"Fix config issue\", \"Build new feature\"",
        },
        _ => return None,
    };
    Some(profile)
}

/// Redirect text for a misrouted message, `None` when correctly routed
///
/// # Examples
///
/// ```
/// use hearth::routing::{classify, misroute_response, ContextRegistry};
///
/// let registry = ContextRegistry::builder()
///     .context("home", "Home Bot", ["dinner"])
///     .context("work", "Work Bot", ["meeting"])
///     .map_session("w", "work")
///     .build();
/// let result = classify(&registry, "w", "dinner plans").unwrap();
/// let text = misroute_response(&result, &registry).unwrap();
/// assert!(text.contains("@home_bot"));
/// assert!(text.contains("**Matched Keywords:** dinner"));
/// ```
pub fn misroute_response(
    result: &ClassificationResult,
    registry: &ContextRegistry,
) -> Option<String> {
    if !result.is_misrouted {
        return None;
    }
    let current = registry.context(&result.current_context)?;
    let recommended = registry.context(&result.recommended_context)?;
    let topics = result.matched_keywords.join(", ");
    let handle = recommended.telegram_handle();

    let (title, message, suggestion, redirect) = match builtin_profile(&recommended.id) {
        Some(profile) => (
            format!("{} {} Bot Response", profile.icon, profile.label),
            format!(
                "I see you're talking about {}. This looks like a {} topic!",
                topics, profile.area
            ),
            format!(
                "For {} topics like {}, please message the **{} Bot** (@{})",
                profile.area, profile.examples_of, profile.label, handle
            ),
            format!(
                "I'll help you with this, but remember for future: {} topics → {} Bot",
                profile.short, profile.label
            ),
        ),
        None => (
            format!("{} Response", recommended.profile.name),
            format!(
                "I see you're talking about {}. This looks like a topic for {}!",
                topics, recommended.profile.name
            ),
            format!(
                "For topics like these, please message **{}** (@{}){}",
                recommended.profile.name,
                handle,
                persona_suffix(recommended)
            ),
            format!(
                "I'll help you with this, but remember for future: {} topics → {}",
                recommended.id, recommended.profile.name
            ),
        ),
    };

    Some(format!(
        "{}\n\n{}\n\n{}\n\n{}\n\n**Current Bot:** {}\n**Recommended Bot:** {}\n**Matched Keywords:** {}\n",
        title,
        message,
        suggestion,
        redirect,
        current.profile.name,
        recommended.profile.name,
        topics
    ))
}

fn persona_suffix(context: &RegisteredContext) -> String {
    if context.profile.persona.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", context.profile.persona.trim())
    }
}

/// "What this bot helps with" text for the context behind `session_key`
///
/// Returns `None` when the session key or its context is unknown.
pub fn session_awareness(session_key: &str, registry: &ContextRegistry) -> Option<String> {
    let id = registry.context_id_for(session_key)?;
    let context = registry.context(id)?;

    Some(match builtin_profile(id) {
        Some(profile) => format!(
            "{} **{} Bot - {}**\nI help with: {}\nExamples: {}\n",
            profile.icon,
            profile.label,
            assistant_title(id),
            profile.helps_with,
            profile.sample_requests
        ),
        None => format!(
            "I am the {}. {}",
            context.profile.name, context.profile.persona
        )
        .trim_end()
        .to_string(),
    })
}

fn assistant_title(context: &str) -> &'static str {
    match context {
        "home" => "Family Assistant",
        "work" => "Business Assistant",
        _ => "Technical Assistant",
    }
}

/// Follow-up recommendations for a classification
pub fn recommendations(
    result: &ClassificationResult,
    registry: &ContextRegistry,
) -> Vec<Recommendation> {
    if !result.is_misrouted {
        return Vec::new();
    }
    let bot = registry
        .context(&result.recommended_context)
        .map(|c| c.profile.name.clone())
        .unwrap_or_else(|| result.recommended_context.clone());

    vec![Recommendation {
        kind: RecommendationKind::Redirect,
        message: format!(
            "Message appears to belong to {} context",
            result.recommended_context
        ),
        action: format!("Consider using {} for similar messages", bot),
    }]
}
