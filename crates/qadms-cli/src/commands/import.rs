use crate::support::{
    ERROR_INTERNAL, ERROR_INVALID_SOURCE_ID, fail, open_store_or_exit, read_payload_or_exit,
    render_json, require_source_id_or_exit, yes_no,
};
use qadms_store::{ImportError, ImportRequest, import_tokens};
use serde_json::json;

pub struct Args {
    pub source_id: String,
    pub payload: String,
    pub store: String,
    pub source_type: String,
    pub input_format: String,
    pub json: bool,
}

pub fn run(args: Args) {
    require_source_id_or_exit(&args.source_id, args.json);
    let input = read_payload_or_exit(&args.payload, args.json);
    let mut store = open_store_or_exit(&args.store, args.json);

    let request = ImportRequest {
        source_id: &args.source_id,
        source_type: &args.source_type,
        input_format: &args.input_format,
        raw_body: &input.bytes,
        payload: &input.value,
    };
    let outcome = import_tokens(&mut store, request).unwrap_or_else(|e| match e {
        ImportError::EmptySourceId => fail(
            ERROR_INVALID_SOURCE_ID,
            "Argument `source-id` must be a non-empty string.",
            json!({}),
            args.json,
        ),
        ImportError::Store(e) => fail(
            ERROR_INTERNAL,
            "Unexpected error while recording token import.",
            json!({"store": args.store, "reason": e.to_string()}),
            args.json,
        ),
    });

    if args.json {
        println!("{}", render_json(&outcome));
    } else {
        println!("qadms import {}", outcome.source_id);
        println!("  Store: {}", store.path().display());
        println!("  Version: {}", outcome.version_id);
        println!("  Imported at: {}", outcome.imported_at.to_rfc3339());
        println!("  Tokens: {}", outcome.token_version.len());
        println!("  Valid: {}", yes_no(outcome.is_valid()));
        for issue in &outcome.validation.errors {
            println!("  error at {}: {}", issue.path, issue.message);
        }
    }

    if !outcome.is_valid() {
        std::process::exit(1);
    }
}
