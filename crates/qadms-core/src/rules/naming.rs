//! `TOKENS_NAMING`: lowercase dot-safe paths carrying their group prefix.

use crate::rule::{Finding, RuleEvaluation, Severity, ViolationLog, object, token_evidence};
use crate::token::CanonicalTokenModel;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

pub const RULE_ID: &str = "TOKENS_NAMING";

pub const CODE_GROUP_PREFIX: &str = "GROUP_PREFIX";
pub const CODE_PATH_FORMAT: &str = "PATH_FORMAT";
pub const CODE_NAME_FORMAT: &str = "NAME_FORMAT";

/// Dot-joined segments of `[a-z0-9]` runs separated by `.`, `_` or `-`.
pub const DOT_SAFE_PATTERN: &str =
    r"^[a-z0-9]+(?:[._-][a-z0-9]+)*(?:\.[a-z0-9]+(?:[._-][a-z0-9]+)*)*$";

const FALLBACK_SEGMENT: &str = "token";

fn dot_safe_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DOT_SAFE_PATTERN).expect("dot-safe regex must compile"))
}

fn camel_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel regex must compile"))
}

fn unsafe_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("unsafe-run regex must compile"))
}

pub fn is_dot_safe(text: &str) -> bool {
    dot_safe_re().is_match(text)
}

fn normalize_segment(segment: &str) -> String {
    let split = camel_boundary_re().replace_all(segment, "$1-$2");
    let dashed = unsafe_run_re().replace_all(&split, "-");
    let trimmed = dashed.trim_matches(|c| c == '-' || c == '_').to_lowercase();
    if trimmed.is_empty() {
        FALLBACK_SEGMENT.to_string()
    } else {
        trimmed
    }
}

/// Suggested dot-safe rewrite of a token path or name.
///
/// `Color.textPrimary` → `color.text-primary`.
pub fn normalize_dot_path(path: &str) -> String {
    let parts: Vec<String> = path
        .split('.')
        .filter(|part| !part.is_empty())
        .map(normalize_segment)
        .collect();
    if parts.is_empty() {
        FALLBACK_SEGMENT.to_string()
    } else {
        parts.join(".")
    }
}

pub fn evaluate_naming(model: &CanonicalTokenModel) -> RuleEvaluation {
    let mut log = ViolationLog::new(RULE_ID);

    for token in model.tokens() {
        let suggested_path = normalize_dot_path(&token.path);
        let suggested_name = normalize_dot_path(&token.name);
        let expected_prefix = format!("{}.", token.group);

        if !token.path.starts_with(&expected_prefix) {
            log.push(Finding {
                code: CODE_GROUP_PREFIX,
                severity: Severity::Medium,
                title: "Token Path Missing Group Prefix",
                description: "Token path must start with its canonical group prefix.",
                evidence: token_evidence(token, json!({"expected_prefix": expected_prefix})),
                fix_hint: object(json!({
                    "action": "rename_token",
                    "target": "path",
                    "suggested_value": format!("{}.{suggested_name}", token.group),
                })),
            });
        }

        if !is_dot_safe(&token.path) {
            log.push(Finding {
                code: CODE_PATH_FORMAT,
                severity: Severity::Medium,
                title: "Token Path Has Invalid Format",
                description: "Use lowercase dot-safe token path segments (a-z, 0-9, -, _).",
                evidence: token_evidence(token, json!({"pattern": DOT_SAFE_PATTERN})),
                fix_hint: object(json!({
                    "action": "rename_token",
                    "target": "path",
                    "suggested_value": suggested_path,
                })),
            });
        }

        if !is_dot_safe(&token.name) {
            log.push(Finding {
                code: CODE_NAME_FORMAT,
                severity: Severity::Medium,
                title: "Token Name Has Invalid Format",
                description: "Use lowercase dot-safe token names (a-z, 0-9, -, _).",
                evidence: token_evidence(token, json!({"pattern": DOT_SAFE_PATTERN})),
                fix_hint: object(json!({
                    "action": "rename_token",
                    "target": "name",
                    "suggested_value": suggested_name,
                })),
            });
        }
    }

    log.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleStatus;
    use crate::token::{CanonicalToken, TokenGroup};
    use serde_json::json;

    fn model(tokens: Vec<CanonicalToken>) -> CanonicalTokenModel {
        CanonicalTokenModel::new("manual_upload", tokens)
    }

    fn color(path: &str, name: &str) -> CanonicalToken {
        CanonicalToken::new(TokenGroup::Color, path, name, "color", json!("#111827"))
    }

    #[test]
    fn valid_names_pass() {
        let result = evaluate_naming(&model(vec![
            color("color.text.primary", "text.primary"),
            color("color.bg.surface-2", "bg.surface-2"),
            color("color.brand_accent.500", "brand_accent.500"),
        ]));
        assert_eq!(result.rule_id, RULE_ID);
        assert_eq!(result.status, RuleStatus::Pass);
        assert_eq!(result.violation_count(), 0);
    }

    #[test]
    fn mixed_case_path_without_prefix_fails() {
        let result = evaluate_naming(&model(vec![color("Color.Text Primary", "Text Primary")]));

        assert_eq!(result.status, RuleStatus::Fail);
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![CODE_GROUP_PREFIX, CODE_PATH_FORMAT, CODE_NAME_FORMAT]);
        assert!(
            result
                .violations
                .iter()
                .all(|v| v.severity == Severity::Medium)
        );

        let prefix = &result.violations[0];
        assert_eq!(prefix.violation_id, "TOKENS_NAMING:1");
        assert_eq!(prefix.evidence["expected_prefix"], "color.");
        assert_eq!(prefix.evidence["token_path"], "Color.Text Primary");
        assert_eq!(prefix.fix_hint["suggested_value"], "color.text-primary");

        assert_eq!(result.violations[1].fix_hint["suggested_value"], "color.text-primary");
        assert_eq!(result.violations[2].fix_hint["target"], "name");
        assert_eq!(result.violations[2].fix_hint["suggested_value"], "text-primary");
    }

    #[test]
    fn group_only_path_misses_prefix_and_name_format() {
        let token = CanonicalToken::new(TokenGroup::Shadow, "shadow", "", "shadow", json!("none"));
        let result = evaluate_naming(&model(vec![token]));
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![CODE_GROUP_PREFIX, CODE_NAME_FORMAT]);
        assert_eq!(result.violations[0].fix_hint["suggested_value"], "shadow.token");
    }

    #[test]
    fn camel_case_segments_are_split() {
        assert_eq!(
            normalize_dot_path("typography.body.base.fontSize"),
            "typography.body.base.font-size"
        );
        assert_eq!(normalize_dot_path("color.brandPrimary2X"), "color.brand-primary2-x");
        assert_eq!(normalize_dot_path("spacing..Large Gap!"), "spacing.large-gap");
        assert_eq!(normalize_dot_path("color.__--"), "color.token");
        assert_eq!(normalize_dot_path("..."), "token");
    }

    #[test]
    fn dot_safe_pattern_rejects_edge_separators() {
        assert!(is_dot_safe("a.b-c_d.1"));
        assert!(!is_dot_safe("a..b"));
        assert!(!is_dot_safe("a-"));
        assert!(!is_dot_safe(".a"));
        assert!(!is_dot_safe(""));
        assert!(!is_dot_safe("fontSize"));
    }

    #[test]
    fn theme_font_size_token_flags_formats_only() {
        let token = CanonicalToken::new(
            TokenGroup::Typography,
            "typography.body.base.fontSize",
            "body.base.fontSize",
            "dimension",
            json!(16),
        );
        let result = evaluate_naming(&model(vec![token]));
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![CODE_PATH_FORMAT, CODE_NAME_FORMAT]);
        assert_eq!(result.violations[1].fix_hint["suggested_value"], "body.base.font-size");
    }
}
