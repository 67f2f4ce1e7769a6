//! Message router: classification, history and responses in one call

use crate::error::Result;
use crate::routing::classifier::{classify, ClassificationResult};
use crate::routing::history::HistoryLog;
use crate::routing::registry::ContextRegistry;
use crate::routing::response::{
    misroute_response, recommendations, session_awareness, Recommendation,
};
use serde::{Deserialize, Serialize};

/// Everything produced for one routed message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOutcome {
    pub classification: ClassificationResult,
    pub awareness: Option<String>,
    pub misroute_response: Option<String>,
    pub recommendations: Vec<Recommendation>,
    /// Set when the history logs could not be written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
}

/// Routes messages against a registry and records them in the history logs
pub struct Router {
    registry: ContextRegistry,
    history: HistoryLog,
}

impl Router {
    pub fn new(registry: ContextRegistry, history: HistoryLog) -> Self {
        Self { registry, history }
    }

    pub fn registry(&self) -> &ContextRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Classify a message and append it to the history logs
    ///
    /// A failed history write does not fail the call: it is logged and
    /// reported in [`RoutingOutcome::history_error`].
    ///
    /// # Errors
    ///
    /// Returns `HearthError::UnknownSession` or `HearthError::NoContextData`
    /// when the session key cannot be resolved
    pub fn route(&self, session_key: &str, message: &str) -> Result<RoutingOutcome> {
        let mut outcome = self.route_without_history(session_key, message)?;

        if let Err(e) = self
            .history
            .record(session_key, message, &outcome.classification)
        {
            tracing::warn!("Routing history not recorded: {}", e);
            outcome.history_error = Some(e.to_string());
        }

        if outcome.classification.is_misrouted {
            tracing::info!(
                "Message on {} looks like it belongs to {} ({})",
                outcome.classification.current_context,
                outcome.classification.recommended_context,
                outcome.classification.matched_keywords.join(", ")
            );
        }

        Ok(outcome)
    }

    /// Classify a message and render responses without touching history
    pub fn route_without_history(&self, session_key: &str, message: &str) -> Result<RoutingOutcome> {
        let classification = classify(&self.registry, session_key, message)?;
        Ok(RoutingOutcome {
            awareness: session_awareness(session_key, &self.registry),
            misroute_response: misroute_response(&classification, &self.registry),
            recommendations: recommendations(&classification, &self.registry),
            classification,
            history_error: None,
        })
    }
}
