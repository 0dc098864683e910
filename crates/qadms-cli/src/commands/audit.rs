use crate::support::{read_payload_or_exit, render_json, require_source_id_or_exit, yes_no};
use chrono::Utc;
use qadms_core::run_audit;
use serde_json::json;
use uuid::Uuid;

pub fn run(source_id: String, payload: String, json_output: bool) {
    require_source_id_or_exit(&source_id, json_output);
    let input = read_payload_or_exit(&payload, json_output);

    let report = run_audit(&input.value);
    let audit_id = Uuid::new_v4().to_string();
    let evaluated_at = Utc::now().to_rfc3339();
    tracing::debug!(
        source_id = %source_id,
        audit_id = %audit_id,
        violations = report.summary.total_violations,
        "audit evaluated"
    );

    if json_output {
        println!(
            "{}",
            render_json(&json!({
                "source_id": source_id,
                "audit_id": audit_id,
                "evaluated_at": evaluated_at,
                "normalization": report.normalization,
                "summary": report.summary,
                "violations": report.violations,
            }))
        );
        return;
    }

    let summary = &report.summary;
    println!("qadms audit {source_id}");
    println!("  Audit: {audit_id}");
    println!("  Evaluated at: {evaluated_at}");
    println!(
        "  Normalization valid: {} ({} error(s), {} warning(s))",
        yes_no(report.normalization.valid),
        report.normalization.error_count,
        report.normalization.warning_count
    );
    println!("  Violations: {}", summary.total_violations);
    println!(
        "    by severity: critical={} high={} medium={} low={}",
        summary.by_severity.critical,
        summary.by_severity.high,
        summary.by_severity.medium,
        summary.by_severity.low
    );
    println!(
        "    by category: tokens={} a11y={} other={}",
        summary.by_category.tokens, summary.by_category.a11y, summary.by_category.other
    );
    for violation in &report.violations {
        println!(
            "  - [{}] {} {} {}",
            violation.severity, violation.category, violation.violation_id, violation.code
        );
    }
}
