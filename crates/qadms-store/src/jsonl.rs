//! JSONL storage: one tagged record per line.
//!
//! Every mutation is applied to a copy of the state, written through a temp
//! file and rename, and only then adopted. A reader never observes a
//! half-written file and a failed write leaves the store unchanged.

use crate::error::StoreError;
use crate::memory::MemoryImportStore;
use crate::records::{NewTokenVersion, SourceRecord, StoreRecord, TokenVersionRecord};
use crate::store::TokenImportStore;
use chrono::Utc;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Durable [`TokenImportStore`] backed by a JSONL file.
#[derive(Debug, Clone)]
pub struct JsonlImportStore {
    path: PathBuf,
    state: MemoryImportStore,
}

impl JsonlImportStore {
    /// Load the store at `path`. A missing file is an empty store; it is
    /// created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = if path.exists() {
            MemoryImportStore::from_records(Self::load(&path)?)
        } else {
            MemoryImportStore::new()
        };
        tracing::debug!(
            path = %path.display(),
            sources = state.sources().count(),
            versions = state.versions().len(),
            "loaded token import store"
        );
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &MemoryImportStore {
        &self.state
    }

    /// Records in file order. Blank lines and `#` comments are skipped;
    /// NUL bytes and invalid UTF-8 are corruption.
    fn load(path: &Path) -> Result<Vec<StoreRecord>, StoreError> {
        let bytes = fs::read(path).map_err(StoreError::io(path))?;
        if bytes.contains(&0) {
            return Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: "contains NUL byte(s)",
            });
        }
        let text = std::str::from_utf8(&bytes).map_err(|_| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: "contains non-UTF-8 byte sequence(s)",
        })?;

        text.lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line_no, line)| {
                serde_json::from_str(line).map_err(|source| StoreError::Record {
                    path: path.to_path_buf(),
                    line: line_no,
                    source,
                })
            })
            .collect()
    }

    /// Apply `mutate` to a copy of the state, persist the copy, then adopt it.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut MemoryImportStore) -> T,
    ) -> Result<T, StoreError> {
        let mut next = self.state.clone();
        let output = mutate(&mut next);
        self.flush(&next)?;
        self.state = next;
        Ok(output)
    }

    fn flush(&self, state: &MemoryImportStore) -> Result<(), StoreError> {
        let records = state.records();
        let mut body = String::new();
        for record in &records {
            body.push_str(&serde_json::to_string(record).map_err(StoreError::Encode)?);
            body.push('\n');
        }

        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(StoreError::io(parent))?;
        }

        let tmp_path = self.tmp_path();
        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(body.as_bytes())?;
            file.sync_all()
        });
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        if let Some(parent) = parent {
            File::open(parent)
                .and_then(|dir| dir.sync_all())
                .map_err(StoreError::io(parent))?;
        }

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "saved token import store"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut tmp: OsString = self.path.as_os_str().to_os_string();
        tmp.push(format!(".tmp.{}.{unique}", std::process::id()));
        PathBuf::from(tmp)
    }
}

impl TokenImportStore for JsonlImportStore {
    fn upsert_source(
        &mut self,
        source_id: &str,
        source_type: &str,
    ) -> Result<SourceRecord, StoreError> {
        let now = Utc::now();
        self.commit(|state| state.upsert_source_at(source_id, source_type, now))
    }

    fn create_token_version(
        &mut self,
        version: NewTokenVersion,
    ) -> Result<TokenVersionRecord, StoreError> {
        let now = Utc::now();
        self.commit(|state| state.create_token_version_at(version, now))
    }

    fn list_versions_for_source(
        &self,
        source_id: &str,
    ) -> Result<Vec<TokenVersionRecord>, StoreError> {
        Ok(self.state.versions_for_source(source_id))
    }
}
