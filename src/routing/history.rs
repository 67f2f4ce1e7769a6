//! Capped routing history logs
//!
//! Every routed message is appended to the log of its arrival context and to
//! a central log. Each log is a JSON array document in the store, trimmed
//! from the front once it grows past its limit.

use crate::config::RoutingConfig;
use crate::error::{HearthError, Result};
use crate::matching::preview;
use crate::routing::classifier::ClassificationResult;
use crate::storage::SharedStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store key of the central routing log
pub const CENTRAL_LOG_KEY: &str = "routing-log";

/// Store key of a context's history log
pub fn context_log_key(context: &str) -> String {
    format!("session-{}-history", context)
}

/// Classification fields kept in a history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSummary {
    pub current_context: String,
    pub recommended_context: String,
    pub is_misrouted: bool,
    pub score: usize,
    pub matched_keywords: Vec<String>,
}

impl From<&ClassificationResult> for ClassificationSummary {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            current_context: result.current_context.clone(),
            recommended_context: result.recommended_context.clone(),
            is_misrouted: result.is_misrouted,
            score: result.score,
            matched_keywords: result.matched_keywords.clone(),
        }
    }
}

/// One history record; never modified after it is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub session_key: String,
    pub context: String,
    pub message_preview: String,
    pub classification: ClassificationSummary,
}

/// Retention and preview limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub context_entries: usize,
    pub central_entries: usize,
    pub context_preview_chars: usize,
    pub central_preview_chars: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            context_entries: 50,
            central_entries: 100,
            context_preview_chars: 200,
            central_preview_chars: 100,
        }
    }
}

impl From<&RoutingConfig> for HistoryLimits {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            context_entries: config.context_history_limit,
            central_entries: config.central_history_limit,
            context_preview_chars: config.context_preview_chars,
            central_preview_chars: config.central_preview_chars,
        }
    }
}

/// Writer and reader for the routing logs
#[derive(Clone)]
pub struct HistoryLog {
    store: SharedStore,
    limits: HistoryLimits,
}

impl HistoryLog {
    pub fn new(store: SharedStore, limits: HistoryLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Append a classification to the context log and the central log
    ///
    /// # Errors
    ///
    /// Returns `HearthError::LogWrite` naming every log that could not be
    /// written. Both logs are attempted even when the first one fails.
    pub fn record(
        &self,
        session_key: &str,
        message: &str,
        result: &ClassificationResult,
    ) -> Result<()> {
        self.record_at(Utc::now(), session_key, message, result)
    }

    /// [`HistoryLog::record`] with an explicit timestamp
    pub fn record_at(
        &self,
        timestamp: DateTime<Utc>,
        session_key: &str,
        message: &str,
        result: &ClassificationResult,
    ) -> Result<()> {
        let entry = |max_chars| HistoryEntry {
            timestamp,
            session_key: session_key.to_string(),
            context: result.current_context.clone(),
            message_preview: preview(message, max_chars),
            classification: ClassificationSummary::from(result),
        };

        let context_key = context_log_key(&result.current_context);
        let failures: Vec<String> = [
            self.append(
                &context_key,
                entry(self.limits.context_preview_chars),
                self.limits.context_entries,
            ),
            self.append(
                CENTRAL_LOG_KEY,
                entry(self.limits.central_preview_chars),
                self.limits.central_entries,
            ),
        ]
        .into_iter()
        .filter_map(|outcome| outcome.err().map(|e| e.to_string()))
        .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HearthError::LogWrite(failures.join("; ")).into())
        }
    }

    fn append(&self, key: &str, entry: HistoryEntry, cap: usize) -> Result<()> {
        let mut entries = self.read_or_fresh(key)?;
        entries.push(entry);
        if entries.len() > cap {
            let excess = entries.len() - cap;
            entries.drain(..excess);
        }

        let value = serde_json::to_value(&entries).map_err(|e| anyhow::anyhow!("{}: {}", key, e))?;
        self.store
            .put(key, &value)
            .map_err(|e| anyhow::anyhow!("{}: {}", key, e))?;

        tracing::trace!("Appended to {} ({} entries)", key, entries.len());
        Ok(())
    }

    /// Existing entries, or an empty log if the document is missing or unreadable
    fn read_or_fresh(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        let value = match self.store.get(key) {
            Ok(value) => value,
            Err(e) => match e.downcast_ref::<HearthError>() {
                Some(HearthError::CorruptDocument(detail)) => {
                    tracing::warn!("History log {} is corrupt, starting fresh: {}", key, detail);
                    None
                }
                _ => return Err(anyhow::anyhow!("{}: {}", key, e)),
            },
        };

        match value {
            None => Ok(Vec::new()),
            Some(value) => match serde_json::from_value(value) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    tracing::warn!("History log {} is unreadable, starting fresh: {}", key, e);
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Entries of a log, oldest first
    ///
    /// # Errors
    ///
    /// Returns a storage error if the log exists but cannot be read or parsed
    pub fn entries(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        Ok(crate::storage::load_document(self.store.as_ref(), key)?.unwrap_or_default())
    }

    /// Entries of a context log, oldest first
    pub fn context_entries(&self, context: &str) -> Result<Vec<HistoryEntry>> {
        self.entries(&context_log_key(context))
    }

    /// Entries of the central log, oldest first
    pub fn central_entries(&self) -> Result<Vec<HistoryEntry>> {
        self.entries(CENTRAL_LOG_KEY)
    }
}
