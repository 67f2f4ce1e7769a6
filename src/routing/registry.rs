//! Context registry loaded from the session-manager document
//!
//! The document lists each context's profile under `sessions`, binds session
//! keys to contexts in `sessionMapping`, and adds extra keyword patterns per
//! context in `autoSwitchPatterns`. Context declaration order is taken from
//! the key order of `sessions` and drives classifier tie-breaks, so it is
//! preserved while parsing rather than left to map iteration order.

use crate::error::{HearthError, Result};
use crate::matching::KeywordSet;
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Persona record for one context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProfile {
    /// Display name, e.g. "Home Bot"
    pub name: String,

    /// Free-text persona description
    #[serde(default)]
    pub persona: String,

    /// Topic keywords
    #[serde(default)]
    pub topics: Vec<String>,

    /// Telegram account handle of the bot serving this context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_account: Option<String>,

    /// Primary session key of the bot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

/// Raw session-manager document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionManagerDocument {
    #[serde(default, deserialize_with = "ordered_entries")]
    pub sessions: Vec<(String, ContextProfile)>,

    #[serde(default)]
    pub session_mapping: HashMap<String, String>,

    #[serde(default)]
    pub auto_switch_patterns: HashMap<String, Vec<String>>,
}

/// Deserialize a JSON object into its entries, keeping document order
fn ordered_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of context names to profiles")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

/// A context with its compiled keyword list
#[derive(Debug, Clone)]
pub struct RegisteredContext {
    pub id: String,
    pub profile: ContextProfile,
    /// Auto-switch patterns followed by topics, deduplicated
    pub keywords: KeywordSet,
}

impl RegisteredContext {
    /// Telegram handle for redirects, falling back to `<id>_bot`
    pub fn telegram_handle(&self) -> String {
        self.profile
            .telegram_account
            .clone()
            .filter(|account| !account.trim().is_empty())
            .unwrap_or_else(|| format!("{}_bot", self.id))
    }
}

/// Immutable set of contexts and session bindings
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
    contexts: Vec<RegisteredContext>,
    mapping: HashMap<String, String>,
}

impl ContextRegistry {
    /// Build a registry from a parsed document
    pub fn from_document(document: SessionManagerDocument) -> Self {
        let SessionManagerDocument {
            sessions,
            session_mapping,
            mut auto_switch_patterns,
        } = document;

        let mut contexts = Vec::with_capacity(sessions.len());
        for (id, profile) in sessions {
            let mut keywords =
                KeywordSet::new(auto_switch_patterns.remove(&id).unwrap_or_default());
            for topic in &profile.topics {
                keywords.push(topic);
            }
            contexts.push(RegisteredContext {
                id,
                profile,
                keywords,
            });
        }

        for orphan in auto_switch_patterns.keys() {
            tracing::warn!(
                "Ignoring auto-switch patterns for undeclared context '{}'",
                orphan
            );
        }

        tracing::debug!(
            "Registered {} contexts and {} session keys",
            contexts.len(),
            session_mapping.len()
        );

        Self {
            contexts,
            mapping: session_mapping,
        }
    }

    /// Parse a session-manager JSON document
    ///
    /// # Errors
    ///
    /// Returns `HearthError::Config` if the JSON is malformed
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SessionManagerDocument = serde_json::from_str(json).map_err(|e| {
            HearthError::Config(format!("Failed to parse session manager document: {}", e))
        })?;
        Ok(Self::from_document(document))
    }

    /// Load the session-manager document from disk
    ///
    /// # Errors
    ///
    /// Returns `HearthError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HearthError::Config(format!(
                "Failed to read session manager {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Start an in-code registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Contexts in declaration order
    pub fn contexts(&self) -> &[RegisteredContext] {
        &self.contexts
    }

    /// Look up a context by id
    pub fn context(&self, id: &str) -> Option<&RegisteredContext> {
        self.contexts.iter().find(|c| c.id == id)
    }

    /// Context id a session key is bound to, without validation
    pub fn context_id_for(&self, session_key: &str) -> Option<&str> {
        self.mapping.get(session_key).map(String::as_str)
    }

    /// Resolve a session key to its context
    ///
    /// # Errors
    ///
    /// Returns `HearthError::UnknownSession` if the key is not mapped, and
    /// `HearthError::NoContextData` if the mapped context is undeclared or has
    /// no keywords
    pub fn resolve(&self, session_key: &str) -> Result<&RegisteredContext> {
        let id = self
            .context_id_for(session_key)
            .ok_or_else(|| HearthError::UnknownSession(session_key.to_string()))?;

        match self.context(id) {
            Some(context) if !context.keywords.is_empty() => Ok(context),
            _ => Err(HearthError::NoContextData(id.to_string()).into()),
        }
    }
}

/// Builder for registries defined in code
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    document: SessionManagerDocument,
}

impl RegistryBuilder {
    /// Declare a context with its display name and topics
    pub fn context<I, S>(mut self, id: &str, name: &str, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document.sessions.push((
            id.to_string(),
            ContextProfile {
                name: name.to_string(),
                topics: topics.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
        ));
        self
    }

    /// Declare a context from a full profile
    pub fn profile(mut self, id: &str, profile: ContextProfile) -> Self {
        self.document.sessions.push((id.to_string(), profile));
        self
    }

    /// Add auto-switch patterns for a context
    pub fn patterns<I, S>(mut self, id: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document
            .auto_switch_patterns
            .entry(id.to_string())
            .or_default()
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Bind a session key to a context
    pub fn map_session(mut self, session_key: &str, context: &str) -> Self {
        self.document
            .session_mapping
            .insert(session_key.to_string(), context.to_string());
        self
    }

    pub fn build(self) -> ContextRegistry {
        ContextRegistry::from_document(self.document)
    }
}
