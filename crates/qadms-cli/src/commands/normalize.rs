use crate::support::{read_payload_or_exit, render_json, yes_no};
use qadms_core::normalize;
use serde_json::json;

pub fn run(payload: String, json_output: bool) {
    let input = read_payload_or_exit(&payload, json_output);
    let (model, report) = normalize(&input.value);

    if json_output {
        println!(
            "{}",
            render_json(&json!({
                "token_version": model,
                "validation": report,
            }))
        );
    } else {
        println!("qadms normalize");
        println!("  Payload: {}", input.label);
        println!("  Valid: {}", yes_no(report.valid));
        println!("  Tokens: {}", model.len());
        for (group, count) in model.token_counts() {
            println!("    {group}: {count}");
        }
        for issue in &report.errors {
            println!("  error at {}: {}", issue.path, issue.message);
        }
        for issue in &report.warnings {
            println!("  warning at {}: {}", issue.path, issue.message);
        }
    }

    if !report.valid {
        std::process::exit(1);
    }
}
