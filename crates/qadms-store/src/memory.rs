//! In-memory token import state.
//!
//! The JSONL store hydrates into this and flushes from it, so both
//! implementations share upsert and listing semantics.

use crate::error::StoreError;
use crate::records::{NewTokenVersion, SourceRecord, StoreRecord, TokenVersionRecord};
use crate::store::TokenImportStore;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImportStore {
    sources: BTreeMap<String, SourceRecord>,
    versions: Vec<TokenVersionRecord>,
}

impl MemoryImportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from persisted records.
    ///
    /// Duplicate source ids resolve last-write-wins; versions keep their
    /// record order.
    pub fn from_records(records: impl IntoIterator<Item = StoreRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut store, record| {
                match record {
                    StoreRecord::Source(source) => {
                        store.sources.insert(source.source_id.clone(), source);
                    }
                    StoreRecord::TokenVersion(version) => store.versions.push(version),
                }
                store
            })
    }

    /// Sources in id order, then versions in import order.
    pub fn records(&self) -> Vec<StoreRecord> {
        self.sources
            .values()
            .cloned()
            .map(StoreRecord::Source)
            .chain(self.versions.iter().cloned().map(StoreRecord::TokenVersion))
            .collect()
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceRecord> {
        self.sources.get(source_id)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceRecord> {
        self.sources.values()
    }

    pub fn versions(&self) -> &[TokenVersionRecord] {
        &self.versions
    }

    /// [`TokenImportStore::upsert_source`] with an explicit clock.
    pub fn upsert_source_at(
        &mut self,
        source_id: &str,
        source_type: &str,
        now: DateTime<Utc>,
    ) -> SourceRecord {
        let record = self
            .sources
            .entry(source_id.to_string())
            .and_modify(|existing| existing.updated_at = now)
            .or_insert_with(|| SourceRecord {
                source_id: source_id.to_string(),
                source_type: source_type.to_string(),
                created_at: now,
                updated_at: now,
            });
        record.clone()
    }

    /// [`TokenImportStore::create_token_version`] with an explicit clock.
    pub fn create_token_version_at(
        &mut self,
        version: NewTokenVersion,
        now: DateTime<Utc>,
    ) -> TokenVersionRecord {
        let record = version.into_record(Uuid::new_v4().to_string(), now);
        self.versions.push(record.clone());
        record
    }

    pub fn versions_for_source(&self, source_id: &str) -> Vec<TokenVersionRecord> {
        self.versions
            .iter()
            .filter(|version| version.source_id == source_id)
            .cloned()
            .collect()
    }
}

impl TokenImportStore for MemoryImportStore {
    fn upsert_source(
        &mut self,
        source_id: &str,
        source_type: &str,
    ) -> Result<SourceRecord, StoreError> {
        Ok(self.upsert_source_at(source_id, source_type, Utc::now()))
    }

    fn create_token_version(
        &mut self,
        version: NewTokenVersion,
    ) -> Result<TokenVersionRecord, StoreError> {
        Ok(self.create_token_version_at(version, Utc::now()))
    }

    fn list_versions_for_source(
        &self,
        source_id: &str,
    ) -> Result<Vec<TokenVersionRecord>, StoreError> {
        Ok(self.versions_for_source(source_id))
    }
}
