//! # QADMS Core
//!
//! Deterministic design-token auditing: a raw token export is admissible
//! input once it normalizes into the canonical token model, and every rule
//! is a pure function over that model.
//!
//! This crate performs **no I/O**. Callers decode bytes into a
//! `serde_json::Value`, hand it to [`normalize`], and run the evaluators
//! against the returned [`CanonicalTokenModel`].
//!
//! ## Architecture
//!
//! ```text
//! serde_json::Value      ← already-decoded export payload
//!     │
//! normalize              ← group-keyed tree + theme-config shapes
//!     │
//! (CanonicalTokenModel,  ← sorted by path, immutable
//!  ValidationReport)     ← structural errors / warnings
//!     │
//! Rule evaluators        ← naming, scale, semantic coverage, contrast
//!     │
//! RuleEvaluation         ← pass/fail + violations (evidence, fix hint)
//!     │
//! run_audit              ← flatten, categorize, sort, summarize
//! ```

pub mod adapter;
pub mod audit;
pub mod color;
pub mod error;
pub mod report;
pub mod rule;
pub mod rules;
pub mod token;

pub use adapter::{DEFAULT_TOKEN_SOURCE, normalize};
pub use audit::{
    AuditReport, AuditSummary, AuditViolation, Category, CategoryCounts, NormalizationSummary,
    SeverityCounts, aggregate, evaluate_all, run_audit,
};
pub use color::{Rgb, contrast_ratio, parse_color, relative_luminance};
pub use error::CoreError;
pub use report::{ValidationIssue, ValidationReport};
pub use rule::{Rule, RuleEvaluation, RuleStatus, RuleViolation, Severity};
pub use rules::{
    ContrastRule, NamingRule, ScaleRule, SemanticCoverageRule, all_rules, evaluate_contrast,
    evaluate_naming, evaluate_scale, evaluate_semantic_coverage, rule_by_id,
};
pub use token::{CanonicalToken, CanonicalTokenModel, TokenGroup};
