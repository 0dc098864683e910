use crate::support::{read_payload_or_exit, render_json};
use qadms_core::{NormalizationSummary, Rule, RuleEvaluation, all_rules, normalize, rule_by_id};
use serde_json::json;

fn select_rules_or_exit(ids: &[String]) -> Vec<Box<dyn Rule>> {
    if ids.is_empty() {
        return all_rules();
    }
    ids.iter()
        .map(|id| {
            rule_by_id(id).unwrap_or_else(|e| {
                eprintln!("error: {e}");
                std::process::exit(2);
            })
        })
        .collect()
}

pub fn run(payload: String, rule_ids: Vec<String>, json_output: bool) {
    let rules = select_rules_or_exit(&rule_ids);
    let input = read_payload_or_exit(&payload, json_output);
    let (model, report) = normalize(&input.value);

    let evaluations: Vec<RuleEvaluation> = rules.iter().map(|rule| rule.evaluate(&model)).collect();
    let all_passed = evaluations.iter().all(RuleEvaluation::passed);

    if json_output {
        println!(
            "{}",
            render_json(&json!({
                "normalization": NormalizationSummary::from(&report),
                "evaluations": evaluations,
            }))
        );
    } else {
        println!("qadms rules");
        println!("  Payload: {}", input.label);
        for evaluation in &evaluations {
            println!(
                "  {}: {} ({} violation(s))",
                evaluation.rule_id,
                evaluation.status,
                evaluation.violation_count()
            );
            for violation in &evaluation.violations {
                let subject = violation
                    .evidence
                    .get("token_path")
                    .or_else(|| violation.evidence.get("text_path"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("-");
                println!(
                    "    - [{}] {} {}: {}",
                    violation.severity, violation.code, subject, violation.title
                );
            }
        }
    }

    if !all_passed {
        std::process::exit(1);
    }
}
