use crate::support::{
    ERROR_INTERNAL, fail, open_store_or_exit, render_json, require_source_id_or_exit, yes_no,
};
use qadms_store::TokenImportStore;
use serde_json::json;

pub fn run(source_id: String, store_path: String, json_output: bool) {
    require_source_id_or_exit(&source_id, json_output);
    let store = open_store_or_exit(&store_path, json_output);
    let versions = store
        .list_versions_for_source(&source_id)
        .unwrap_or_else(|e| {
            fail(
                ERROR_INTERNAL,
                "Failed to list token versions.",
                json!({"store": store_path, "reason": e.to_string()}),
                json_output,
            )
        });
    let source = store.state().source(&source_id);

    if json_output {
        println!(
            "{}",
            render_json(&json!({
                "source_id": source_id,
                "source": source,
                "versions": versions,
            }))
        );
        return;
    }

    println!("qadms versions {source_id}");
    println!("  Store: {}", store.path().display());
    match source {
        Some(source) => println!(
            "  Source: {} (created {}, updated {})",
            source.source_type,
            source.created_at.to_rfc3339(),
            source.updated_at.to_rfc3339()
        ),
        None => println!("  Source: not found"),
    }
    println!("  Versions: {}", versions.len());
    for version in &versions {
        let tokens: usize = version.token_counts.values().sum();
        println!(
            "    - {} {} tokens={} valid={} sha256={}",
            version.version_id,
            version.imported_at.to_rfc3339(),
            tokens,
            yes_no(version.validation_valid),
            version.input_sha256
        );
    }
}
