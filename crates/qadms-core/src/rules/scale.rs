//! `TOKENS_SCALE`: numeric scale health for spacing and typography.
//!
//! Per token: values must parse to a number and be positive. Per group:
//! the sorted unique positive values form a scale whose consecutive steps
//! are compared against the smallest and largest step.

use crate::rule::{Finding, RuleEvaluation, Severity, ViolationLog, object, token_evidence};
use crate::token::{CanonicalToken, CanonicalTokenModel, TokenGroup};
use regex::Regex;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const RULE_ID: &str = "TOKENS_SCALE";

pub const CODE_INVALID_NUMERIC_VALUE: &str = "INVALID_NUMERIC_VALUE";
pub const CODE_NON_POSITIVE_VALUE: &str = "NON_POSITIVE_VALUE";
pub const CODE_SCALE_GAP: &str = "SCALE_GAP";
pub const CODE_SCALE_COMPRESSION: &str = "SCALE_COMPRESSION";

pub const TARGET_GROUPS: [TokenGroup; 2] = [TokenGroup::Spacing, TokenGroup::Typography];

/// Minimum number of distinct values before step ratios mean anything.
const MIN_SCALE_LEN: usize = 3;
/// A step this many times the smallest step is a gap; a step at most
/// `1 / STEP_RATIO` of the largest is compressed.
const STEP_RATIO: f64 = 3.0;

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("numeric regex must compile"))
}

/// Extract a number from a token value.
///
/// Numbers are taken as-is, `{"$value": ..}`/`{"value": ..}` objects are
/// unwrapped, and strings yield their first ASCII decimal literal
/// (`"16px"` → 16). Literals too large for an `f64` are unparsable.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Object(map) => map
            .get("$value")
            .or_else(|| map.get("value"))
            .and_then(parse_numeric),
        Value::String(text) => numeric_re()
            .find(text.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|number| number.is_finite()),
        _ => None,
    }
}

pub fn evaluate_scale(model: &CanonicalTokenModel) -> RuleEvaluation {
    let mut log = ViolationLog::new(RULE_ID);
    for group in TARGET_GROUPS {
        evaluate_group(&mut log, model, group);
    }
    log.finish()
}

fn evaluate_group(log: &mut ViolationLog, model: &CanonicalTokenModel, group: TokenGroup) {
    // Positive values keyed by bit pattern: for positive floats bit order is
    // numeric order. The first token carrying a value represents it.
    let mut scale: BTreeMap<u64, (f64, &CanonicalToken)> = BTreeMap::new();

    for token in model.group(group) {
        let Some(number) = parse_numeric(&token.value) else {
            log.push(Finding {
                code: CODE_INVALID_NUMERIC_VALUE,
                severity: Severity::Medium,
                title: "Scale Token Is Not Numeric",
                description: "Scale checks require numeric token values.",
                evidence: token_evidence(token, json!({"raw_value": token.value})),
                fix_hint: object(json!({
                    "action": "set_numeric_value",
                    "group": group,
                    "suggested_value": 1,
                })),
            });
            continue;
        };

        if number <= 0.0 {
            let suggested = if number == 0.0 { json!(1) } else { json!(number.abs()) };
            log.push(Finding {
                code: CODE_NON_POSITIVE_VALUE,
                severity: Severity::High,
                title: "Scale Token Must Be Positive",
                description: "Scale token values should be greater than zero.",
                evidence: token_evidence(token, json!({"parsed_value": number})),
                fix_hint: object(json!({
                    "action": "set_positive_value",
                    "group": group,
                    "suggested_value": suggested,
                })),
            });
            continue;
        }

        scale.entry(number.to_bits()).or_insert((number, token));
    }

    if scale.len() < MIN_SCALE_LEN {
        return;
    }

    let steps: Vec<(f64, &CanonicalToken)> = scale.into_values().collect();
    let deltas: Vec<f64> = steps.windows(2).map(|pair| pair[1].0 - pair[0].0).collect();
    let min_delta = deltas.iter().copied().fold(f64::INFINITY, f64::min);
    let max_delta = deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let has_variance = max_delta > min_delta;

    for (pair, &delta) in steps.windows(2).zip(&deltas) {
        let (lower, lower_token) = pair[0];
        let (upper, upper_token) = pair[1];

        if min_delta > 0.0 && delta >= min_delta * STEP_RATIO {
            log.push(Finding {
                code: CODE_SCALE_GAP,
                severity: Severity::Medium,
                title: "Large Scale Gap Detected",
                description: "Scale step jump is significantly larger than the smallest observed step.",
                evidence: token_evidence(
                    upper_token,
                    json!({
                        "lower_path": lower_token.path,
                        "lower_value": lower,
                        "upper_path": upper_token.path,
                        "upper_value": upper,
                        "delta": delta,
                        "smallest_delta": min_delta,
                    }),
                ),
                fix_hint: object(json!({
                    "action": "adjust_scale_step",
                    "group": group,
                    "suggested_delta": min_delta,
                    "between_values": [lower, upper],
                })),
            });
        }

        if has_variance && max_delta > 0.0 && delta <= max_delta / STEP_RATIO {
            log.push(Finding {
                code: CODE_SCALE_COMPRESSION,
                severity: Severity::Low,
                title: "Compressed Scale Step Detected",
                description: "Scale step is much smaller than the largest observed step.",
                evidence: token_evidence(
                    upper_token,
                    json!({
                        "lower_path": lower_token.path,
                        "lower_value": lower,
                        "upper_path": upper_token.path,
                        "upper_value": upper,
                        "delta": delta,
                        "largest_delta": max_delta,
                    }),
                ),
                fix_hint: object(json!({
                    "action": "normalize_scale_step",
                    "group": group,
                    "suggested_delta": max_delta,
                    "between_values": [lower, upper],
                })),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleStatus;

    fn spacing(name: &str, value: Value) -> CanonicalToken {
        CanonicalToken::new(
            TokenGroup::Spacing,
            format!("spacing.{name}"),
            name,
            "dimension",
            value,
        )
    }

    fn model(tokens: Vec<CanonicalToken>) -> CanonicalTokenModel {
        CanonicalTokenModel::new("manual_upload", tokens)
    }

    #[test]
    fn parses_numbers_strings_and_nested_values() {
        assert_eq!(parse_numeric(&json!(8)), Some(8.0));
        assert_eq!(parse_numeric(&json!("  12.5px ")), Some(12.5));
        assert_eq!(parse_numeric(&json!("-4rem")), Some(-4.0));
        assert_eq!(parse_numeric(&json!({"$value": "16px"})), Some(16.0));
        assert_eq!(parse_numeric(&json!({"value": {"value": 2}})), Some(2.0));
        assert_eq!(parse_numeric(&json!({"unit": "px"})), None);
        assert_eq!(parse_numeric(&json!("auto")), None);
        assert_eq!(parse_numeric(&json!([4])), None);
        assert_eq!(parse_numeric(&json!(true)), None);
    }

    #[test]
    fn only_ascii_digits_count_and_overflow_is_unparsable() {
        assert_eq!(parse_numeric(&json!("\u{0664}px or 8px")), Some(8.0));
        assert_eq!(parse_numeric(&json!("\u{0664}px")), None);
        assert_eq!(parse_numeric(&json!("9".repeat(400))), None);

        let result = evaluate_scale(&model(vec![
            spacing("a", json!(4)),
            spacing("b", json!(8)),
            spacing("huge", json!(format!("{}px", "9".repeat(400)))),
        ]));
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![CODE_INVALID_NUMERIC_VALUE]);
        assert_eq!(result.violations[0].evidence["token_path"], "spacing.huge");
    }

    #[test]
    fn even_scale_passes() {
        let result = evaluate_scale(&model(vec![
            spacing("xs", json!(4)),
            spacing("sm", json!("8px")),
            spacing("md", json!(12)),
            spacing("lg", json!(16)),
        ]));
        assert_eq!(result.rule_id, RULE_ID);
        assert_eq!(result.status, RuleStatus::Pass);
    }

    #[test]
    fn large_jump_flags_single_gap_on_upper_token() {
        let result = evaluate_scale(&model(vec![
            spacing("a", json!(4)),
            spacing("b", json!(8)),
            spacing("c", json!(24)),
        ]));

        let gaps: Vec<_> = result.with_code(CODE_SCALE_GAP).collect();
        assert_eq!(gaps.len(), 1);
        let gap = gaps[0];
        assert_eq!(gap.severity, Severity::Medium);
        assert_eq!(gap.evidence["token_path"], "spacing.c");
        assert_eq!(gap.evidence["lower_path"], "spacing.b");
        assert_eq!(gap.evidence["upper_value"], json!(24.0));
        assert_eq!(gap.evidence["delta"], json!(16.0));
        assert_eq!(gap.evidence["smallest_delta"], json!(4.0));
        assert_eq!(gap.fix_hint["between_values"], json!([8.0, 24.0]));

        let compressed: Vec<_> = result.with_code(CODE_SCALE_COMPRESSION).collect();
        assert_eq!(compressed.len(), 1);
        assert_eq!(compressed[0].severity, Severity::Low);
        assert_eq!(compressed[0].evidence["token_path"], "spacing.b");
        assert_eq!(compressed[0].evidence["largest_delta"], json!(16.0));
    }

    #[test]
    fn invalid_and_non_positive_values_are_flagged() {
        let result = evaluate_scale(&model(vec![
            spacing("auto", json!("auto")),
            spacing("neg", json!(-2)),
            spacing("zero", json!("0px")),
        ]));

        assert_eq!(result.status, RuleStatus::Fail);
        let invalid: Vec<_> = result.with_code(CODE_INVALID_NUMERIC_VALUE).collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].evidence["raw_value"], "auto");
        assert_eq!(invalid[0].fix_hint["group"], "spacing");

        let non_positive: Vec<_> = result.with_code(CODE_NON_POSITIVE_VALUE).collect();
        assert_eq!(non_positive.len(), 2);
        assert!(non_positive.iter().all(|v| v.severity == Severity::High));
        assert_eq!(non_positive[0].fix_hint["suggested_value"], json!(2.0));
        assert_eq!(non_positive[1].fix_hint["suggested_value"], json!(1));
    }

    #[test]
    fn duplicate_values_collapse_before_sequence_checks() {
        let result = evaluate_scale(&model(vec![
            spacing("a", json!(4)),
            spacing("b", json!("4px")),
            spacing("c", json!(8)),
        ]));
        assert!(result.passed());
    }

    #[test]
    fn groups_are_evaluated_independently() {
        let typography = |name: &str, value: Value| {
            CanonicalToken::new(
                TokenGroup::Typography,
                format!("typography.{name}"),
                name,
                "dimension",
                value,
            )
        };
        let result = evaluate_scale(&model(vec![
            spacing("a", json!(4)),
            spacing("b", json!(8)),
            typography("sm", json!(12)),
            typography("md", json!(14)),
            typography("lg", json!(16)),
            CanonicalToken::new(TokenGroup::Radius, "radius.x", "x", "dimension", json!("none")),
        ]));
        assert!(result.passed());
    }

    #[test]
    fn violation_ids_number_across_groups() {
        let result = evaluate_scale(&model(vec![
            spacing("bad", json!("auto")),
            CanonicalToken::new(
                TokenGroup::Typography,
                "typography.bad",
                "bad",
                "dimension",
                json!(null),
            ),
        ]));
        let ids: Vec<&str> = result
            .violations
            .iter()
            .map(|v| v.violation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["TOKENS_SCALE:1", "TOKENS_SCALE:2"]);
    }
}
