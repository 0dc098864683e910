//! Canonical token model.
//!
//! Every supported export shape normalizes into the same representation:
//! a flat, path-sorted list of [`CanonicalToken`]s grouped under a fixed set
//! of [`TokenGroup`]s. Rule evaluators only ever see this model.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The fixed top-level token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenGroup {
    Color,
    Spacing,
    Typography,
    Radius,
    Shadow,
}

impl TokenGroup {
    pub const ALL: [TokenGroup; 5] = [
        Self::Color,
        Self::Spacing,
        Self::Typography,
        Self::Radius,
        Self::Shadow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::Radius => "radius",
            Self::Shadow => "shadow",
        }
    }

    /// Token type assigned to leaves that do not declare `$type`/`type`.
    pub fn default_token_type(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing | Self::Typography | Self::Radius => "dimension",
            Self::Shadow => "shadow",
        }
    }

    /// Resolve an exact top-level payload key. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == key)
    }
}

impl std::fmt::Display for TokenGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim().to_ascii_lowercase().as_str())
            .ok_or_else(|| CoreError::UnknownGroup(s.to_string()))
    }
}

/// One normalized design value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalToken {
    pub group: TokenGroup,
    /// Dot-delimited position in the canonical tree, prefixed by the group.
    pub path: String,
    /// `path` without the leading group segment.
    pub name: String,
    pub token_type: String,
    pub value: Value,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    crate::adapter::DEFAULT_TOKEN_SOURCE.to_string()
}

impl CanonicalToken {
    /// Build a token with the default provenance tag.
    pub fn new(
        group: TokenGroup,
        path: impl Into<String>,
        name: impl Into<String>,
        token_type: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            group,
            path: path.into(),
            name: name.into(),
            token_type: token_type.into(),
            value,
            source: default_source(),
        }
    }

    /// Dot-delimited segments of the token path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }
}

/// Normalized, path-sorted token set.
///
/// Construction sorts tokens stably by `path`; afterwards the model only
/// hands out shared references, so evaluators can read it concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTokenModel {
    source: String,
    tokens: Vec<CanonicalToken>,
}

impl CanonicalTokenModel {
    /// Build a model, sorting tokens ascending by path.
    ///
    /// Ties keep their emission order. Duplicate paths are retained.
    pub fn new(source: impl Into<String>, mut tokens: Vec<CanonicalToken>) -> Self {
        tokens.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            source: source.into(),
            tokens,
        }
    }

    /// A model with no tokens.
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[CanonicalToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens of one group, in path order.
    pub fn group(&self, group: TokenGroup) -> impl Iterator<Item = &CanonicalToken> {
        self.tokens.iter().filter(move |token| token.group == group)
    }

    /// Token count per group name. Derived on every call.
    pub fn token_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for token in &self.tokens {
            *counts.entry(token.group.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Serialize)]
struct ModelView<'a> {
    source: &'a str,
    tokens: &'a [CanonicalToken],
    token_counts: BTreeMap<String, usize>,
}

impl Serialize for CanonicalTokenModel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ModelView {
            source: &self.source,
            tokens: &self.tokens,
            token_counts: self.token_counts(),
        }
        .serialize(serializer)
    }
}
