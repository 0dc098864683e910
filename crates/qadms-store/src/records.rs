//! Persisted record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A token source (a Figma file, a theme export, ...) known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: String,
    pub source_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One imported snapshot of a source's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVersionRecord {
    pub version_id: String,
    pub source_id: String,
    pub imported_at: DateTime<Utc>,
    pub input_format: String,
    /// Lowercase hex SHA-256 of the raw request bytes.
    pub input_sha256: String,
    pub token_source: String,
    #[serde(default)]
    pub token_counts: BTreeMap<String, usize>,
    pub validation_valid: bool,
}

/// Caller-supplied fields of a new version; id and timestamp are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTokenVersion {
    pub source_id: String,
    pub input_format: String,
    pub input_sha256: String,
    pub token_source: String,
    pub token_counts: BTreeMap<String, usize>,
    pub validation_valid: bool,
}

impl NewTokenVersion {
    pub(crate) fn into_record(
        self,
        version_id: String,
        imported_at: DateTime<Utc>,
    ) -> TokenVersionRecord {
        TokenVersionRecord {
            version_id,
            source_id: self.source_id,
            imported_at,
            input_format: self.input_format,
            input_sha256: self.input_sha256,
            token_source: self.token_source,
            token_counts: self.token_counts,
            validation_valid: self.validation_valid,
        }
    }
}

/// One line of the JSONL store, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreRecord {
    Source(SourceRecord),
    TokenVersion(TokenVersionRecord),
}
