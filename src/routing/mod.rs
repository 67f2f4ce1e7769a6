//! Cross-context message routing
//!
//! This module contains:
//! - The context registry built from the session-manager document
//! - Keyword scoring and misroute detection
//! - Capped per-context and central history logs
//! - Redirect and awareness responses, tied together by [`Router`]

pub mod classifier;
pub mod history;
pub mod registry;
pub mod response;
pub mod router;

pub use classifier::{classify, ClassificationResult, Confidence, ContextScore};
pub use history::{
    context_log_key, ClassificationSummary, HistoryEntry, HistoryLimits, HistoryLog,
    CENTRAL_LOG_KEY,
};
pub use registry::{ContextProfile, ContextRegistry, RegisteredContext, SessionManagerDocument};
pub use response::{
    misroute_response, recommendations, session_awareness, Recommendation, RecommendationKind,
};
pub use router::{Router, RoutingOutcome};
