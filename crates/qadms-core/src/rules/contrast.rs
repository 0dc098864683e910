//! `A11Y_CONTRAST`: every text color must reach WCAG AA (4.5:1) against the
//! worst background color in the set.

use crate::color::{Rgb, contrast_ratio, parse_color};
use crate::rule::{Finding, RuleEvaluation, Severity, ViolationLog, object};
use crate::token::{CanonicalToken, CanonicalTokenModel, TokenGroup};
use serde_json::{Map, Value, json};

pub const RULE_ID: &str = "A11Y_CONTRAST";

pub const CODE_INVALID_TEXT_COLOR: &str = "INVALID_TEXT_COLOR";
pub const CODE_INVALID_BACKGROUND_COLOR: &str = "INVALID_BACKGROUND_COLOR";
pub const CODE_LOW_CONTRAST: &str = "LOW_CONTRAST";

/// WCAG 2.x AA threshold for normal-size text.
pub const WCAG_AA_TEXT_THRESHOLD: f64 = 4.5;
/// Below this ratio a low-contrast pair is escalated to `high`.
pub const HIGH_SEVERITY_THRESHOLD: f64 = 3.0;

pub const TEXT_MARKERS: [&str; 3] = ["text", "foreground", "fg"];
pub const BACKGROUND_MARKERS: [&str; 5] = ["bg", "background", "surface", "canvas", "card"];

const SUPPORTED_FORMATS: [&str; 4] = ["#RRGGBB", "#RGB", "rgb()", "hsl()"];

/// True when a non-leading segment of the lowercased path equals a marker.
fn has_marker(token: &CanonicalToken, markers: &[&str]) -> bool {
    let path = token.path.to_lowercase();
    markers.iter().any(|marker| {
        path.contains(&format!(".{marker}.")) || path.ends_with(&format!(".{marker}"))
    })
}

pub fn is_text_token(token: &CanonicalToken) -> bool {
    has_marker(token, &TEXT_MARKERS)
}

pub fn is_background_token(token: &CanonicalToken) -> bool {
    has_marker(token, &BACKGROUND_MARKERS)
}

fn pair_evidence(
    text: &CanonicalToken,
    background: &CanonicalToken,
    extra: Value,
) -> Map<String, Value> {
    let mut evidence = object(json!({
        "text_path": text.path,
        "text_name": text.name,
        "bg_path": background.path,
        "bg_name": background.name,
    }));
    evidence.extend(object(extra));
    evidence
}

fn format_fix_hint() -> Map<String, Value> {
    object(json!({
        "action": "normalize_color_format",
        "supported_formats": SUPPORTED_FORMATS,
    }))
}

struct WorstPair<'a> {
    ratio: f64,
    background: &'a CanonicalToken,
}

/// Lowest-ratio parsable background for a text color; first wins ties.
fn worst_background<'a>(text: Rgb, backgrounds: &[&'a CanonicalToken]) -> Option<WorstPair<'a>> {
    backgrounds
        .iter()
        .filter_map(|&background| {
            parse_color(&background.value).map(|rgb| WorstPair {
                ratio: contrast_ratio(text, rgb),
                background,
            })
        })
        .fold(None, |worst: Option<WorstPair<'a>>, candidate| match worst {
            Some(current) if current.ratio <= candidate.ratio => Some(current),
            _ => Some(candidate),
        })
}

pub fn evaluate_contrast(model: &CanonicalTokenModel) -> RuleEvaluation {
    let mut log = ViolationLog::new(RULE_ID);

    let colors: Vec<&CanonicalToken> = model.group(TokenGroup::Color).collect();
    let texts: Vec<&CanonicalToken> = colors
        .iter()
        .copied()
        .filter(|t| is_text_token(t))
        .collect();
    let backgrounds: Vec<&CanonicalToken> = colors
        .iter()
        .copied()
        .filter(|t| is_background_token(t))
        .collect();

    let Some(first_background) = backgrounds.first().copied() else {
        return log.finish();
    };

    for text in texts {
        let Some(text_rgb) = parse_color(&text.value) else {
            log.push(Finding {
                code: CODE_INVALID_TEXT_COLOR,
                severity: Severity::Medium,
                title: "Unparseable Text Color",
                description: "Text color token format is not supported for contrast checks.",
                evidence: pair_evidence(
                    text,
                    first_background,
                    json!({"raw_text_value": text.value}),
                ),
                fix_hint: format_fix_hint(),
            });
            continue;
        };

        let Some(worst) = worst_background(text_rgb, &backgrounds) else {
            let candidates: Vec<&str> = backgrounds.iter().map(|b| b.path.as_str()).collect();
            log.push(Finding {
                code: CODE_INVALID_BACKGROUND_COLOR,
                severity: Severity::Medium,
                title: "No Parseable Background Color",
                description: "Background tokens were found, but none could be parsed for contrast checks.",
                evidence: pair_evidence(
                    text,
                    first_background,
                    json!({"candidate_backgrounds": candidates}),
                ),
                fix_hint: format_fix_hint(),
            });
            continue;
        };

        if worst.ratio < WCAG_AA_TEXT_THRESHOLD {
            let severity = if worst.ratio < HIGH_SEVERITY_THRESHOLD {
                Severity::High
            } else {
                Severity::Medium
            };
            log.push(Finding {
                code: CODE_LOW_CONTRAST,
                severity,
                title: "Text/Background Contrast Below WCAG AA",
                description: "Contrast ratio is below the 4.5:1 threshold for normal text.",
                evidence: pair_evidence(
                    text,
                    worst.background,
                    json!({
                        "text_value": text.value,
                        "bg_value": worst.background.value,
                        "contrast_ratio": worst.ratio,
                        "required_ratio": WCAG_AA_TEXT_THRESHOLD,
                    }),
                ),
                fix_hint: object(json!({
                    "action": "increase_contrast",
                    "required_ratio": WCAG_AA_TEXT_THRESHOLD,
                    "suggestion": "Adjust text or background token values to increase luminance difference.",
                })),
            });
        }
    }

    log.finish()
}
