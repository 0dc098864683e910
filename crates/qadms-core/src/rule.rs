//! Rule results: violations, evaluations, and the [`Rule`] seam.

use crate::error::CoreError;
use crate::token::{CanonicalToken, CanonicalTokenModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Violation severity.
///
/// Declaration order is risk order. Reports that need the historical
/// lexicographic ordering sort on [`Severity::as_str`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| CoreError::UnknownSeverity(s.to_string()))
    }
}

/// Overall rule outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl RuleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected design-quality issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// `{rule_id}:{1-based emission index}`.
    pub violation_id: String,
    pub rule_id: String,
    pub code: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub evidence: Map<String, Value>,
    #[serde(default)]
    pub fix_hint: Map<String, Value>,
}

/// Result of running one rule over one model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub status: RuleStatus,
    #[serde(default)]
    pub violations: Vec<RuleViolation>,
}

impl RuleEvaluation {
    /// Status is derived: `pass` iff there are no violations.
    pub fn from_violations(rule_id: impl Into<String>, violations: Vec<RuleViolation>) -> Self {
        let status = if violations.is_empty() {
            RuleStatus::Pass
        } else {
            RuleStatus::Fail
        };
        Self {
            rule_id: rule_id.into(),
            status,
            violations,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == RuleStatus::Pass
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Violations carrying `code`, in emission order.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a RuleViolation> {
        self.violations.iter().filter(move |v| v.code == code)
    }
}

#[derive(Serialize)]
struct EvaluationView<'a> {
    rule_id: &'a str,
    status: RuleStatus,
    violation_count: usize,
    violations: &'a [RuleViolation],
}

impl Serialize for RuleEvaluation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EvaluationView {
            rule_id: &self.rule_id,
            status: self.status,
            violation_count: self.violation_count(),
            violations: &self.violations,
        }
        .serialize(serializer)
    }
}

/// A deterministic check over the canonical token model.
///
/// Implementations hold no state; `evaluate` may run concurrently with any
/// other rule against the same model.
pub trait Rule: Send + Sync {
    /// Stable rule identifier, e.g. `TOKENS_NAMING`.
    fn id(&self) -> &'static str;

    fn evaluate(&self, model: &CanonicalTokenModel) -> RuleEvaluation;
}

/// Violation fields a rule decides; id and rule id are assigned on push.
pub(crate) struct Finding {
    pub code: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
    pub evidence: Map<String, Value>,
    pub fix_hint: Map<String, Value>,
}

/// Accumulates violations for one evaluator invocation, numbering them in
/// emission order.
pub(crate) struct ViolationLog {
    rule_id: &'static str,
    violations: Vec<RuleViolation>,
}

impl ViolationLog {
    pub fn new(rule_id: &'static str) -> Self {
        Self {
            rule_id,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        let index = self.violations.len() + 1;
        self.violations.push(RuleViolation {
            violation_id: format!("{}:{index}", self.rule_id),
            rule_id: self.rule_id.to_string(),
            code: finding.code.to_string(),
            severity: finding.severity,
            title: finding.title.to_string(),
            description: finding.description.to_string(),
            evidence: finding.evidence,
            fix_hint: finding.fix_hint,
        });
    }

    pub fn finish(self) -> RuleEvaluation {
        RuleEvaluation::from_violations(self.rule_id, self.violations)
    }
}

/// Unwrap a `json!({...})` literal into its map.
pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Identity of the offending token, merged with rule-specific facts.
pub(crate) fn token_evidence(token: &CanonicalToken, extra: Value) -> Map<String, Value> {
    let mut evidence = Map::new();
    evidence.insert("token_path".to_string(), Value::String(token.path.clone()));
    evidence.insert("token_name".to_string(), Value::String(token.name.clone()));
    evidence.insert(
        "token_group".to_string(),
        Value::String(token.group.as_str().to_string()),
    );
    evidence.extend(object(extra));
    evidence
}
