//! Export payload normalization.
//!
//! Two payload shapes are accepted and may coexist:
//!
//! - **Group-keyed tree**: `color`, `spacing`, `typography`, `radius` and
//!   `shadow` map to nested objects. An object carrying `$value`/`value` is a
//!   leaf; every other object key is a path segment.
//! - **Theme config**: a `colors` array of `{name|variable, hex|hsl}` entries
//!   and a `uiTokens` object with optional `radius`/`fontSize`.
//!
//! The tree walk is a fold: each step takes the accumulated [`Walk`] by value
//! and returns it, so no collector is shared across recursive calls.

use crate::report::ValidationReport;
use crate::token::{CanonicalToken, CanonicalTokenModel, TokenGroup};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Provenance tag for tokens produced by [`normalize`].
pub const DEFAULT_TOKEN_SOURCE: &str = "figma_export";

/// Diagnostic path for payload-level problems.
pub const ROOT_PATH: &str = "$";

const THEME_COLORS_KEY: &str = "colors";
const THEME_UI_TOKENS_KEY: &str = "uiTokens";

const MSG_ROOT_NOT_OBJECT: &str = "Figma export must be a JSON object.";
const MSG_NO_GROUPS: &str = "At least one supported token group is required.";
const MSG_GROUP_NOT_OBJECT: &str = "Top-level token group must be an object.";
const MSG_LEAF_MISSING_VALUE: &str = "Token leaf is missing $value/value.";
const MSG_BAD_BRANCH: &str = "Token branches must be objects or token leaves.";
const MSG_UNKNOWN_GROUP: &str = "Unknown top-level group ignored by canonical mapping.";
const MSG_COLORS_NOT_ARRAY: &str = "Theme config `colors` must be an array.";
const MSG_COLOR_NOT_OBJECT: &str = "Each color entry must be an object.";
const MSG_COLOR_MISSING_VALUE: &str = "Color entry must include `hex` or `hsl`.";
const MSG_UI_TOKENS_NOT_OBJECT: &str = "Theme config `uiTokens` must be an object.";

/// Tokens and diagnostics accumulated so far.
#[derive(Debug, Default)]
struct Walk {
    tokens: Vec<CanonicalToken>,
    report: ValidationReport,
}

impl Walk {
    fn token(mut self, token: CanonicalToken) -> Self {
        self.tokens.push(token);
        self
    }

    fn error(mut self, path: impl Into<String>, message: &str) -> Self {
        self.report.add_error(path, message);
        self
    }

    fn warning(mut self, path: impl Into<String>, message: &str) -> Self {
        self.report.add_warning(path, message);
        self
    }
}

/// Normalize a decoded export payload into the canonical token model.
///
/// Never fails: every structural problem is recorded in the returned
/// report and the walk continues with the next sibling.
pub fn normalize(payload: &Value) -> (CanonicalTokenModel, ValidationReport) {
    let Some(root) = payload.as_object() else {
        let walk = Walk::default().error(ROOT_PATH, MSG_ROOT_NOT_OBJECT);
        return (CanonicalTokenModel::empty(DEFAULT_TOKEN_SOURCE), walk.report);
    };

    let theme_present =
        root.contains_key(THEME_COLORS_KEY) || root.contains_key(THEME_UI_TOKENS_KEY);
    let walk = collect_theme_config(Walk::default(), root);

    let mut found_group = false;
    let mut walk = root.iter().fold(walk, |walk, (key, node)| {
        match TokenGroup::from_key(key) {
            Some(group) => {
                found_group = true;
                if node.is_object() {
                    walk_node(walk, group, node, &[])
                } else {
                    walk.error(key.as_str(), MSG_GROUP_NOT_OBJECT)
                }
            }
            None if theme_present && is_theme_key(key) => walk,
            None => walk.warning(key.as_str(), MSG_UNKNOWN_GROUP),
        }
    });

    if !found_group && !theme_present {
        walk = walk.error(ROOT_PATH, MSG_NO_GROUPS);
    }

    let model = CanonicalTokenModel::new(DEFAULT_TOKEN_SOURCE, walk.tokens);
    (model, walk.report)
}

fn is_theme_key(key: &str) -> bool {
    key == THEME_COLORS_KEY || key == THEME_UI_TOKENS_KEY
}

/// `$value` takes precedence over `value`, `$type` over `type`.
fn leaf_field<'a>(
    node: &'a Map<String, Value>,
    primary: &str,
    fallback: &str,
) -> Option<&'a Value> {
    node.get(primary).or_else(|| node.get(fallback))
}

fn is_leaf(node: &Map<String, Value>) -> bool {
    node.contains_key("$value") || node.contains_key("value")
}

fn walk_node(walk: Walk, group: TokenGroup, node: &Value, segments: &[&str]) -> Walk {
    let path = join_path(group, segments);

    match node {
        Value::Object(map) if is_leaf(map) => {
            let value = leaf_field(map, "$value", "value").filter(|value| !value.is_null());
            let Some(value) = value else {
                return walk.error(path, MSG_LEAF_MISSING_VALUE);
            };
            let token_type = leaf_field(map, "$type", "type")
                .filter(|token_type| !token_type.is_null())
                .map(render_token_type)
                .unwrap_or_else(|| group.default_token_type().to_string());
            walk.token(CanonicalToken::new(
                group,
                path,
                segments.join("."),
                token_type,
                value.clone(),
            ))
        }
        Value::Object(map) => map.iter().fold(walk, |walk, (key, child)| {
            let mut child_segments = segments.to_vec();
            child_segments.push(key.as_str());
            walk_node(walk, group, child, &child_segments)
        }),
        _ => walk.error(path, MSG_BAD_BRANCH),
    }
}

fn join_path(group: TokenGroup, segments: &[&str]) -> String {
    if segments.is_empty() {
        group.as_str().to_string()
    } else {
        format!("{}.{}", group.as_str(), segments.join("."))
    }
}

fn render_token_type(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn collect_theme_config(walk: Walk, root: &Map<String, Value>) -> Walk {
    let walk = match root.get(THEME_COLORS_KEY) {
        None => walk,
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .fold(walk, |walk, (index, entry)| theme_color(walk, index, entry)),
        Some(_) => walk.error(THEME_COLORS_KEY, MSG_COLORS_NOT_ARRAY),
    };

    match root.get(THEME_UI_TOKENS_KEY) {
        None => walk,
        Some(Value::Object(ui_tokens)) => {
            let mut walk = walk;
            if let Some(radius) = ui_tokens.get("radius") {
                walk = walk.token(CanonicalToken::new(
                    TokenGroup::Radius,
                    "radius.base",
                    "base",
                    TokenGroup::Radius.default_token_type(),
                    radius.clone(),
                ));
            }
            if let Some(font_size) = ui_tokens.get("fontSize") {
                walk = walk.token(CanonicalToken::new(
                    TokenGroup::Typography,
                    "typography.body.base.fontSize",
                    "body.base.fontSize",
                    TokenGroup::Typography.default_token_type(),
                    font_size.clone(),
                ));
            }
            walk
        }
        Some(_) => walk.error(THEME_UI_TOKENS_KEY, MSG_UI_TOKENS_NOT_OBJECT),
    }
}

fn theme_color(walk: Walk, index: usize, entry: &Value) -> Walk {
    let path = format!("{THEME_COLORS_KEY}[{index}]");
    let Some(entry) = entry.as_object() else {
        return walk.error(path, MSG_COLOR_NOT_OBJECT);
    };

    let raw_name = ["name", "variable"]
        .iter()
        .filter_map(|key| entry.get(*key))
        .find(|value| is_truthy(value))
        .map(render_token_type)
        .unwrap_or_else(|| format!("color_{index}"));
    let name = slugify(&raw_name.replace("--", ""));

    let value = leaf_field(entry, "hex", "hsl").filter(|value| !value.is_null());
    let Some(value) = value else {
        return walk.error(path, MSG_COLOR_MISSING_VALUE);
    };

    walk.token(CanonicalToken::new(
        TokenGroup::Color,
        format!("color.{name}"),
        name,
        TokenGroup::Color.default_token_type(),
        value.clone(),
    ))
}

/// Empty strings, zero, `false`, `null` and empty containers do not name a color.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn non_slug_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug regex must compile"))
}

/// Lowercase, collapse non-alphanumeric runs to `.`, trim dots.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let slug = non_slug_run_re().replace_all(&lowered, ".");
    let slug = slug.trim_matches('.');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(model: &CanonicalTokenModel) -> Vec<&str> {
        model.tokens().iter().map(|t| t.path.as_str()).collect()
    }

    #[test]
    fn flattens_nested_groups() {
        let payload = json!({
            "color": {
                "text": {
                    "primary": {"$value": "#111827", "$type": "color"},
                    "muted": {"value": "#6b7280"}
                },
                "bg": {"surface": {"$value": "#ffffff"}}
            },
            "spacing": {
                "sm": {"$value": "4px"},
                "md": {"value": 8, "type": "spacing"}
            }
        });

        let (model, report) = normalize(&payload);

        assert!(report.valid);
        assert!(report.warnings.is_empty());
        assert_eq!(
            paths(&model),
            vec![
                "color.bg.surface",
                "color.text.muted",
                "color.text.primary",
                "spacing.md",
                "spacing.sm",
            ]
        );
        let md = &model.tokens()[3];
        assert_eq!(md.name, "md");
        assert_eq!(md.token_type, "spacing");
        assert_eq!(md.value, json!(8));
        assert_eq!(model.tokens()[4].token_type, "dimension");
        assert_eq!(model.tokens()[0].source, DEFAULT_TOKEN_SOURCE);
    }

    #[test]
    fn dollar_fields_win_over_plain_fields() {
        let payload = json!({
            "radius": {"sm": {"$value": 2, "value": 99, "$type": "radius", "type": "other"}}
        });
        let (model, _) = normalize(&payload);
        assert_eq!(model.tokens()[0].value, json!(2));
        assert_eq!(model.tokens()[0].token_type, "radius");
    }

    #[test]
    fn null_type_falls_back_to_group_default() {
        let payload = json!({
            "spacing": {"sm": {"$value": 4, "$type": null}},
            "color": {"ink": {"value": "#000", "type": null}}
        });
        let (model, report) = normalize(&payload);
        assert!(report.valid);
        assert_eq!(model.tokens()[0].token_type, "color");
        assert_eq!(model.tokens()[1].token_type, "dimension");
    }

    #[test]
    fn group_level_leaf_uses_group_as_path() {
        let payload = json!({"shadow": {"$value": "0 1px 2px #000"}});
        let (model, report) = normalize(&payload);
        assert!(report.valid);
        assert_eq!(paths(&model), vec!["shadow"]);
        assert_eq!(model.tokens()[0].name, "");
        assert_eq!(model.tokens()[0].token_type, "shadow");
    }

    #[test]
    fn null_leaf_value_is_an_error_and_dropped() {
        let payload = json!({
            "color": {
                "broken": {"$value": null},
                "ok": {"$value": "#000000"}
            }
        });
        let (model, report) = normalize(&payload);
        assert!(!report.valid);
        assert_eq!(report.errors_at("color.broken").count(), 1);
        assert_eq!(paths(&model), vec!["color.ok"]);
    }

    #[test]
    fn scalar_branches_are_errors_and_siblings_continue() {
        let payload = json!({
            "spacing": {
                "bad": 4,
                "list": [1, 2],
                "good": {"$value": 8}
            },
            "radius": "4px"
        });
        let (model, report) = normalize(&payload);
        assert!(!report.valid);
        assert_eq!(report.errors_at("spacing.bad").count(), 1);
        assert_eq!(report.errors_at("spacing.list").count(), 1);
        assert_eq!(report.errors_at("radius").count(), 1);
        assert_eq!(paths(&model), vec!["spacing.good"]);
    }

    #[test]
    fn unknown_top_level_keys_warn_only() {
        let payload = json!({
            "color": {"primary": {"$value": "#000"}},
            "meta": {"version": 2}
        });
        let (_, report) = normalize(&payload);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "meta");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let (model, report) = normalize(&json!(["color"]));
        assert!(!report.valid);
        assert!(model.is_empty());
        assert_eq!(report.errors_at(ROOT_PATH).count(), 1);
    }

    #[test]
    fn payload_without_groups_is_rejected() {
        let (model, report) = normalize(&json!({"foo": {}, "bar": 1}));
        assert!(!report.valid);
        assert!(model.is_empty());
        assert_eq!(report.errors_at(ROOT_PATH).count(), 1);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn empty_group_still_counts_as_found() {
        let (model, report) = normalize(&json!({"color": {}}));
        assert!(report.valid);
        assert!(model.is_empty());
    }

    #[test]
    fn theme_config_shape_maps_colors_and_ui_tokens() {
        let payload = json!({
            "colors": [
                {"name": "Brand Primary", "hex": "#1F936D"},
                {"variable": "--surface-bg", "hsl": "hsl(0, 0%, 100%)"},
                {"hex": "#000000"},
                {"name": "No Value"},
                "not-an-object"
            ],
            "uiTokens": {"radius": "0.5rem", "fontSize": 16}
        });

        let (model, report) = normalize(&payload);

        assert_eq!(
            paths(&model),
            vec![
                "color.brand.primary",
                "color.color.2",
                "color.surface.bg",
                "radius.base",
                "typography.body.base.fontSize",
            ]
        );
        assert_eq!(model.tokens()[2].value, json!("hsl(0, 0%, 100%)"));
        assert_eq!(model.tokens()[4].value, json!(16));
        assert!(!report.valid);
        assert_eq!(report.errors_at("colors[3]").count(), 1);
        assert_eq!(report.errors_at("colors[4]").count(), 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn theme_config_alone_satisfies_group_requirement() {
        let (model, report) = normalize(&json!({"uiTokens": {"radius": 4}}));
        assert!(report.valid);
        assert_eq!(paths(&model), vec!["radius.base"]);
    }

    #[test]
    fn malformed_theme_sections_are_errors() {
        let (_, report) = normalize(&json!({"colors": {"a": 1}, "uiTokens": []}));
        assert!(!report.valid);
        assert_eq!(report.errors_at("colors").count(), 1);
        assert_eq!(report.errors_at("uiTokens").count(), 1);
        assert_eq!(report.errors_at(ROOT_PATH).count(), 0);
    }

    #[test]
    fn theme_tokens_precede_tree_tokens_on_path_ties() {
        let payload = json!({
            "uiTokens": {"radius": "theme"},
            "radius": {"base": {"$value": "tree"}}
        });
        let (model, _) = normalize(&payload);
        assert_eq!(paths(&model), vec!["radius.base", "radius.base"]);
        assert_eq!(model.tokens()[0].value, json!("theme"));
        assert_eq!(model.tokens()[1].value, json!("tree"));
    }

    #[test]
    fn diagnostics_and_path_ties_follow_payload_order() {
        let payload: Value = serde_json::from_str(
            r##"{
                "spacing": {"z": 1, "a": 2},
                "meta": 1,
                "extra": 2,
                "color": {
                    "b.a": {"$value": "dotted-key"},
                    "b": {"a": {"$value": "nested-key"}}
                }
            }"##,
        )
        .expect("payload is json");

        let (model, report) = normalize(&payload);

        let errors: Vec<&str> = report.errors.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(errors, vec!["spacing.z", "spacing.a"]);
        let warnings: Vec<&str> = report.warnings.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(warnings, vec!["meta", "extra"]);
        let values: Vec<&Value> = model.tokens().iter().map(|t| &t.value).collect();
        assert_eq!(values, vec![&json!("dotted-key"), &json!("nested-key")]);
        assert_eq!(paths(&model), vec!["color.b.a", "color.b.a"]);
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("  Brand / Primary!! "), "brand.primary");
        assert_eq!(slugify("***"), "unnamed");
        assert_eq!(slugify("text-2XL"), "text.2xl");
    }

    #[test]
    fn normalization_is_idempotent() {
        let payload = json!({
            "color": {"b": {"$value": "#fff"}, "a": {"$value": "#000"}},
            "colors": [{"name": "z", "hex": "#123"}]
        });
        let (first, first_report) = normalize(&payload);
        let (second, second_report) = normalize(&payload);
        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
    }
}
