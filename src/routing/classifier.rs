//! Keyword scoring of messages against every registered context

use crate::error::Result;
use crate::routing::registry::ContextRegistry;
use serde::{Deserialize, Serialize};

/// Score of a single context for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextScore {
    pub context: String,
    pub score: usize,
    pub matched_keywords: Vec<String>,
}

/// How strongly the arrival context is supported by the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// The arrival context matched at least one keyword
    High,
    /// Only other contexts matched
    Low,
    /// Nothing matched
    Neutral,
}

/// Outcome of classifying one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub current_context: String,
    pub recommended_context: String,
    /// Score of the recommended context
    pub score: usize,
    /// Keywords of the recommended context found in the message
    pub matched_keywords: Vec<String>,
    pub is_misrouted: bool,
    pub confidence: Confidence,
    /// Every context's score, in declaration order
    pub scores: Vec<ContextScore>,
}

impl ClassificationResult {
    /// Short summary of what the message is about
    pub fn summary(&self) -> String {
        if self.matched_keywords.is_empty() {
            "No topic keywords matched".to_string()
        } else {
            format!(
                "Message appears to be about: {}",
                self.matched_keywords.join(", ")
            )
        }
    }

    /// Score of a given context
    pub fn score_for(&self, context: &str) -> Option<usize> {
        self.scores
            .iter()
            .find(|s| s.context == context)
            .map(|s| s.score)
    }
}

/// Classify `message` as received on `session_key`
///
/// Every context is scored by the number of its keywords found in the
/// message as case-insensitive substrings. The strictly highest score wins;
/// equal scores go to the context declared first. When nothing matches the
/// arrival context is recommended and the message is not misrouted.
///
/// This function has no side effects; history is written by the router.
///
/// # Errors
///
/// Returns `HearthError::UnknownSession` or `HearthError::NoContextData`
/// when the session key cannot be resolved
///
/// # Examples
///
/// ```
/// use hearth::routing::{classify, ContextRegistry};
///
/// let registry = ContextRegistry::builder()
///     .context("home", "Home Bot", ["shopping list", "dinner"])
///     .context("work", "Work Bot", ["project", "meeting"])
///     .map_session("agent:main:telegram:work:dm:1", "work")
///     .build();
///
/// let result = classify(
///     &registry,
///     "agent:main:telegram:work:dm:1",
///     "Add chicken to shopping list for dinner",
/// )
/// .unwrap();
/// assert_eq!(result.recommended_context, "home");
/// assert!(result.is_misrouted);
/// assert_eq!(result.matched_keywords, vec!["shopping list", "dinner"]);
/// ```
pub fn classify(
    registry: &ContextRegistry,
    session_key: &str,
    message: &str,
) -> Result<ClassificationResult> {
    let current = registry.resolve(session_key)?;
    let lowered = message.to_lowercase();

    let scores: Vec<ContextScore> = registry
        .contexts()
        .iter()
        .map(|context| {
            let matched: Vec<String> = context
                .keywords
                .find_in_lowered(&lowered)
                .into_iter()
                .map(str::to_string)
                .collect();
            ContextScore {
                context: context.id.clone(),
                score: matched.len(),
                matched_keywords: matched,
            }
        })
        .collect();

    let mut best: Option<&ContextScore> = None;
    for candidate in scores.iter().filter(|s| s.score > 0) {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    let current_score = scores
        .iter()
        .find(|s| s.context == current.id)
        .map_or(0, |s| s.score);

    let (recommended_context, score, matched_keywords) = match best {
        Some(winner) => (
            winner.context.clone(),
            winner.score,
            winner.matched_keywords.clone(),
        ),
        None => (current.id.clone(), 0, Vec::new()),
    };

    let confidence = if current_score > 0 {
        Confidence::High
    } else if best.is_some() {
        Confidence::Low
    } else {
        Confidence::Neutral
    };

    let is_misrouted = recommended_context != current.id && score > 0;

    tracing::debug!(
        "Classified message on {} ({}): recommended {} with score {}",
        session_key,
        current.id,
        recommended_context,
        score
    );

    Ok(ClassificationResult {
        current_context: current.id.clone(),
        recommended_context,
        score,
        matched_keywords,
        is_misrouted,
        confidence,
        scores,
    })
}
