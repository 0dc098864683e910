//! `TOKENS_SEMANTIC_COVERAGE`: interactive color tokens need a base token
//! plus hover, focus and disabled variants.

use crate::rule::{Finding, RuleEvaluation, Severity, ViolationLog, object, token_evidence};
use crate::token::{CanonicalToken, CanonicalTokenModel, TokenGroup};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

pub const RULE_ID: &str = "TOKENS_SEMANTIC_COVERAGE";

pub const CODE_MISSING_BASE_STATE: &str = "MISSING_BASE_STATE";
pub const CODE_MISSING_SEMANTIC_STATES: &str = "MISSING_SEMANTIC_STATES";

pub const REQUIRED_STATES: [&str; 3] = ["hover", "focus", "disabled"];
pub const INTERACTIVE_SEGMENTS: [&str; 7] = [
    "button",
    "link",
    "action",
    "control",
    "input",
    "cta",
    "interactive",
];

/// Paths shorter than `color.<component>.<variant>` are not semantic tokens.
const MIN_SEGMENTS: usize = 3;

fn is_interactive(token: &CanonicalToken) -> bool {
    token
        .segments()
        .any(|segment| INTERACTIVE_SEGMENTS.contains(&segment))
}

/// Split a trailing state segment off a path: `a.b.hover` → (`a.b`, hover).
pub fn split_state(path: &str) -> (&str, Option<&str>) {
    match path.rsplit_once('.') {
        Some((root, last)) if REQUIRED_STATES.contains(&last) => (root, Some(last)),
        _ => (path, None),
    }
}

struct RootCoverage<'a> {
    representative: &'a CanonicalToken,
    states: BTreeSet<&'a str>,
}

pub fn evaluate_semantic_coverage(model: &CanonicalTokenModel) -> RuleEvaluation {
    let mut log = ViolationLog::new(RULE_ID);

    // Later duplicates of a path win, matching a path-keyed lookup table.
    let by_path: BTreeMap<&str, &CanonicalToken> = model
        .group(TokenGroup::Color)
        .map(|token| (token.path.as_str(), token))
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut roots: BTreeMap<&str, RootCoverage<'_>> = BTreeMap::new();

    for token in model.group(TokenGroup::Color) {
        if token.segments().count() < MIN_SEGMENTS || !is_interactive(token) {
            continue;
        }
        let (root, state) = split_state(&token.path);
        let coverage = roots.entry(root).or_insert_with(|| {
            order.push(root);
            RootCoverage {
                representative: token,
                states: BTreeSet::new(),
            }
        });
        if let Some(state) = state {
            coverage.states.insert(state);
        }
    }

    for root in order {
        let Some(coverage) = roots.get(root) else {
            continue;
        };
        let base = by_path.get(root).copied();
        let present: Vec<&str> = coverage.states.iter().copied().collect();

        if base.is_none() {
            log.push(Finding {
                code: CODE_MISSING_BASE_STATE,
                severity: Severity::Medium,
                title: "Missing Base Semantic Token",
                description: "State tokens exist but the base semantic token is missing.",
                evidence: token_evidence(
                    coverage.representative,
                    json!({"root_path": root, "states_found": present}),
                ),
                fix_hint: object(json!({
                    "action": "create_base_semantic_token",
                    "root_path": root,
                })),
            });
        }

        let mut missing: Vec<&str> = REQUIRED_STATES
            .iter()
            .copied()
            .filter(|state| !coverage.states.contains(state))
            .collect();
        missing.sort_unstable();

        if !missing.is_empty() {
            log.push(Finding {
                code: CODE_MISSING_SEMANTIC_STATES,
                severity: Severity::Medium,
                title: "Missing Semantic State Coverage",
                description: "Interactive semantic tokens should provide hover, focus, and disabled states.",
                evidence: token_evidence(
                    base.unwrap_or(coverage.representative),
                    json!({
                        "root_path": root,
                        "required_states": REQUIRED_STATES,
                        "present_states": present,
                        "missing_states": missing,
                    }),
                ),
                fix_hint: object(json!({
                    "action": "add_semantic_states",
                    "root_path": root,
                    "missing_states": missing,
                })),
            });
        }
    }

    log.finish()
}
