use crate::error::StoreError;
use crate::records::{NewTokenVersion, SourceRecord, TokenVersionRecord};

/// Persistence capability needed by the import flow.
pub trait TokenImportStore {
    /// Ensure a source exists. A new source gets `created_at == updated_at`;
    /// an existing one keeps `created_at` and bumps `updated_at`.
    fn upsert_source(&mut self, source_id: &str, source_type: &str)
    -> Result<SourceRecord, StoreError>;

    /// Record a new token version with a fresh id and import timestamp.
    fn create_token_version(
        &mut self,
        version: NewTokenVersion,
    ) -> Result<TokenVersionRecord, StoreError>;

    /// Versions recorded for `source_id`, in import order.
    fn list_versions_for_source(
        &self,
        source_id: &str,
    ) -> Result<Vec<TokenVersionRecord>, StoreError>;
}
