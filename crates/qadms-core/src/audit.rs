//! Whole-payload audit: normalize, run every rule, flatten and summarize.

use crate::adapter::normalize;
use crate::report::ValidationReport;
use crate::rule::{RuleEvaluation, RuleViolation, Severity};
use crate::rules::all_rules;
use crate::token::CanonicalTokenModel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reporting bucket for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tokens,
    A11y,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::A11y => "a11y",
            Self::Other => "other",
        }
    }

    pub fn for_rule(rule_id: &str) -> Self {
        if rule_id.starts_with("TOKENS_") {
            Self::Tokens
        } else if rule_id == crate::rules::contrast::RULE_ID {
            Self::A11y
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`RuleViolation`] tagged with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditViolation {
    pub violation_id: String,
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    pub code: String,
    pub title: String,
    pub description: String,
    pub evidence: Map<String, Value>,
    pub fix_hint: Map<String, Value>,
}

impl AuditViolation {
    fn from_violation(violation: RuleViolation) -> Self {
        Self {
            category: Category::for_rule(&violation.rule_id),
            violation_id: violation.violation_id,
            rule_id: violation.rule_id,
            severity: violation.severity,
            code: violation.code,
            title: violation.title,
            description: violation.description,
            evidence: violation.evidence,
            fix_hint: violation.fix_hint,
        }
    }

    fn sort_key(&self) -> (&str, &str, &str, &str, &str) {
        (
            self.severity.as_str(),
            self.category.as_str(),
            self.rule_id.as_str(),
            self.code.as_str(),
            self.violation_id.as_str(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub tokens: usize,
    pub a11y: usize,
    pub other: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_violations: usize,
    pub by_severity: SeverityCounts,
    pub by_category: CategoryCounts,
    pub by_rule: BTreeMap<String, usize>,
}

impl AuditSummary {
    fn tally(violations: &[AuditViolation]) -> Self {
        violations.iter().fold(
            Self {
                total_violations: violations.len(),
                ..Self::default()
            },
            |mut summary, violation| {
                match violation.severity {
                    Severity::Low => summary.by_severity.low += 1,
                    Severity::Medium => summary.by_severity.medium += 1,
                    Severity::High => summary.by_severity.high += 1,
                    Severity::Critical => summary.by_severity.critical += 1,
                }
                match violation.category {
                    Category::Tokens => summary.by_category.tokens += 1,
                    Category::A11y => summary.by_category.a11y += 1,
                    Category::Other => summary.by_category.other += 1,
                }
                *summary
                    .by_rule
                    .entry(violation.rule_id.clone())
                    .or_default() += 1;
                summary
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationSummary {
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
}

impl From<&ValidationReport> for NormalizationSummary {
    fn from(report: &ValidationReport) -> Self {
        Self {
            valid: report.valid,
            error_count: report.error_count(),
            warning_count: report.warning_count(),
        }
    }
}

/// Aggregated result of one audit run. Identity (`audit_id`, timestamps,
/// source) is stamped by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub normalization: NormalizationSummary,
    pub summary: AuditSummary,
    pub violations: Vec<AuditViolation>,
}

/// Run every registered rule against `model`, in registry order.
pub fn evaluate_all(model: &CanonicalTokenModel) -> Vec<RuleEvaluation> {
    all_rules()
        .iter()
        .map(|rule| rule.evaluate(model))
        .collect()
}

/// Flatten evaluations into a sorted, summarized report.
///
/// Ordering compares severity *names* as strings, so `critical` < `high` <
/// `low` < `medium`. Consumers that want risk order should re-sort on
/// [`Severity`] directly.
pub fn aggregate(report: &ValidationReport, evaluations: Vec<RuleEvaluation>) -> AuditReport {
    let mut violations: Vec<AuditViolation> = evaluations
        .into_iter()
        .flat_map(|evaluation| evaluation.violations)
        .map(AuditViolation::from_violation)
        .collect();
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    AuditReport {
        normalization: NormalizationSummary::from(report),
        summary: AuditSummary::tally(&violations),
        violations,
    }
}

pub fn run_audit(payload: &Value) -> AuditReport {
    let (model, report) = normalize(payload);
    aggregate(&report, evaluate_all(&model))
}
