//! Import flow: normalize a payload, register its source, record a version.

use crate::error::StoreError;
use crate::records::NewTokenVersion;
use crate::store::TokenImportStore;
use chrono::{DateTime, Utc};
use qadms_core::{CanonicalTokenModel, ValidationReport, normalize};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const DEFAULT_SOURCE_TYPE: &str = "figma";
pub const DEFAULT_INPUT_FORMAT: &str = "figma_json";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("source id must be a non-empty string")]
    EmptySourceId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One import: the decoded payload plus the raw bytes it was decoded from.
#[derive(Debug, Clone, Copy)]
pub struct ImportRequest<'a> {
    pub source_id: &'a str,
    pub source_type: &'a str,
    pub input_format: &'a str,
    pub raw_body: &'a [u8],
    pub payload: &'a Value,
}

impl<'a> ImportRequest<'a> {
    /// A Figma JSON import with the default source type and format.
    pub fn figma(source_id: &'a str, raw_body: &'a [u8], payload: &'a Value) -> Self {
        Self {
            source_id,
            source_type: DEFAULT_SOURCE_TYPE,
            input_format: DEFAULT_INPUT_FORMAT,
            raw_body,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub source_id: String,
    pub version_id: String,
    pub imported_at: DateTime<Utc>,
    pub token_version: CanonicalTokenModel,
    pub validation: ValidationReport,
}

impl ImportOutcome {
    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Normalize and persist one import.
///
/// An invalid validation report does not abort the import: the version is
/// still recorded with `validation_valid = false`.
pub fn import_tokens(
    store: &mut impl TokenImportStore,
    request: ImportRequest<'_>,
) -> Result<ImportOutcome, ImportError> {
    if request.source_id.trim().is_empty() {
        return Err(ImportError::EmptySourceId);
    }

    let (model, validation) = normalize(request.payload);
    store.upsert_source(request.source_id, request.source_type)?;
    let version = store.create_token_version(NewTokenVersion {
        source_id: request.source_id.to_string(),
        input_format: request.input_format.to_string(),
        input_sha256: sha256_hex(request.raw_body),
        token_source: model.source().to_string(),
        token_counts: model.token_counts(),
        validation_valid: validation.valid,
    })?;

    tracing::info!(
        source_id = %version.source_id,
        version_id = %version.version_id,
        tokens = model.len(),
        valid = validation.valid,
        "recorded token version"
    );

    Ok(ImportOutcome {
        source_id: version.source_id,
        version_id: version.version_id,
        imported_at: version.imported_at,
        token_version: model,
        validation,
    })
}
