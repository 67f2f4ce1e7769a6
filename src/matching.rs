//! Keyword and pattern matching shared by the router and the planner
//!
//! Both engines reduce text to lowercase and test it against ordered lists:
//! the router counts keyword substring hits, the grocery categorizer walks a
//! list of regex rules and stops at the first match.

use anyhow::Result;
use regex::Regex;

/// Ordered, case-insensitively deduplicated keyword list.
///
/// Blank entries are dropped so an empty keyword can never match every
/// message. The first spelling of a duplicated keyword is kept.
///
/// # Examples
///
/// ```
/// use hearth::matching::KeywordSet;
///
/// let set = KeywordSet::new(["Dinner", "shopping list", "dinner", " "]);
/// assert_eq!(set.len(), 2);
/// let hits = set.find_in("What's for DINNER tonight?");
/// assert_eq!(hits, vec!["Dinner"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
    lowered: Vec<String>,
}

impl KeywordSet {
    /// Build a set from keywords in declaration order
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for keyword in keywords {
            set.push(keyword.as_ref());
        }
        set
    }

    /// Append a keyword unless it is blank or already present
    pub fn push(&mut self, keyword: &str) {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return;
        }
        let lowered = trimmed.to_lowercase();
        if self.lowered.contains(&lowered) {
            return;
        }
        self.keywords.push(trimmed.to_string());
        self.lowered.push(lowered);
    }

    /// Number of distinct keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// True when no keyword survived normalization
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in declaration order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Keywords occurring in `text` as case-insensitive substrings,
    /// in declaration order, each at most once.
    pub fn find_in(&self, text: &str) -> Vec<&str> {
        let haystack = text.to_lowercase();
        self.find_in_lowered(&haystack)
    }

    /// Same as [`KeywordSet::find_in`] for text that is already lowercase.
    pub fn find_in_lowered(&self, haystack: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .zip(&self.lowered)
            .filter(|(_, lowered)| haystack.contains(lowered.as_str()))
            .map(|(original, _)| original.as_str())
            .collect()
    }
}

/// Ordered list of labelled regex rules evaluated top to bottom.
///
/// Matching is done against the lowercased input and the first rule whose
/// pattern matches wins; later rules are never consulted.
///
/// # Examples
///
/// ```
/// use hearth::matching::PatternList;
///
/// let rules = PatternList::new(vec![
///     ("Produce", "(tomato|onion)"),
///     ("Pantry", "(tomato paste|rice)"),
/// ])
/// .unwrap();
/// assert_eq!(rules.first_match("Tomato Paste"), Some(&"Produce"));
/// assert_eq!(rules.first_match("Rice"), Some(&"Pantry"));
/// assert_eq!(rules.first_match("Soap"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PatternList<L> {
    rules: Vec<(L, Regex)>,
}

impl<L> PatternList<L> {
    /// Compile the rules, failing on the first invalid pattern
    pub fn new<P: AsRef<str>>(rules: Vec<(L, P)>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (label, pattern) in rules {
            compiled.push((label, Regex::new(pattern.as_ref())?));
        }
        Ok(Self { rules: compiled })
    }

    /// Label of the first rule matching `text`, if any
    pub fn first_match(&self, text: &str) -> Option<&L> {
        let haystack = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(&haystack))
            .map(|(label, _)| label)
    }

    /// Labels in evaluation order
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.rules.iter().map(|(label, _)| label)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the list holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Cuts on character boundaries so multi-byte text never panics.
///
/// # Examples
///
/// ```
/// use hearth::matching::preview;
///
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("abcdefgh", 3), "abc...");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
