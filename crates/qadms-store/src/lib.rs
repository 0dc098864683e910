//! # qadms-store
//!
//! Persistence layer for token imports.
//!
//! This crate provides:
//! - `SourceRecord` and `TokenVersionRecord` (what an import leaves behind)
//! - the `TokenImportStore` capability trait
//! - an in-memory store and a durable JSONL store
//! - `import_tokens`, which normalizes a payload and records a version
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one tagged record per line)
//!     ↕  load / rewrite
//! MemoryImportStore (sources by id + versions in import order)
//! ```

pub mod error;
pub mod import;
pub mod jsonl;
pub mod memory;
pub mod records;
pub mod store;

pub use error::StoreError;
pub use import::{
    DEFAULT_INPUT_FORMAT, DEFAULT_SOURCE_TYPE, ImportError, ImportOutcome, ImportRequest,
    import_tokens, sha256_hex,
};
pub use jsonl::JsonlImportStore;
pub use memory::MemoryImportStore;
pub use records::{NewTokenVersion, SourceRecord, StoreRecord, TokenVersionRecord};
pub use store::TokenImportStore;
