use qadms_store::JsonlImportStore;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::io::Read;

pub const STDIN_ARG: &str = "-";

pub const ERROR_INVALID_SOURCE_ID: &str = "invalid_source_id";
pub const ERROR_INVALID_JSON: &str = "invalid_json";
pub const ERROR_INTERNAL: &str = "internal_error";

/// Transport-style error envelope: `{"error": {code, message, details}}`.
pub fn error_envelope(code: &str, message: &str, details: Value) -> Value {
    let details = if details.is_object() { details } else { json!({}) };
    json!({
        "error": {
            "code": code,
            "message": message,
            "details": details,
        }
    })
}

/// Report a failure and exit. JSON mode prints the envelope on stdout;
/// text mode prints a one-line error on stderr. Internal errors exit 1,
/// input errors exit 2.
pub fn fail(code: &str, message: &str, details: Value, json_output: bool) -> ! {
    if json_output {
        println!("{}", render_json(&error_envelope(code, message, details)));
    } else {
        eprintln!("error: {message} ({code})");
    }
    std::process::exit(if code == ERROR_INTERNAL { 1 } else { 2 });
}

pub fn require_source_id_or_exit(source_id: &str, json_output: bool) {
    if source_id.trim().is_empty() {
        fail(
            ERROR_INVALID_SOURCE_ID,
            "Argument `source-id` must be a non-empty string.",
            json!({}),
            json_output,
        );
    }
}

/// Raw bytes plus the decoded JSON value of a payload argument.
pub struct Payload {
    pub label: String,
    pub bytes: Vec<u8>,
    pub value: Value,
}

fn read_payload_bytes(arg: &str) -> std::io::Result<Vec<u8>> {
    if arg == STDIN_ARG {
        let mut bytes = Vec::new();
        std::io::stdin().lock().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        fs::read(arg)
    }
}

pub fn read_payload_or_exit(arg: &str, json_output: bool) -> Payload {
    let label = if arg == STDIN_ARG {
        "<stdin>".to_string()
    } else {
        arg.to_string()
    };
    let bytes = read_payload_bytes(arg).unwrap_or_else(|e| {
        fail(
            ERROR_INTERNAL,
            "Failed to read payload.",
            json!({"payload": label, "reason": e.to_string()}),
            json_output,
        )
    });
    let value = decode_payload(&bytes).unwrap_or_else(|reason| {
        fail(
            ERROR_INVALID_JSON,
            "Payload must be valid UTF-8 JSON.",
            json!({"payload": label, "reason": reason}),
            json_output,
        )
    });
    Payload {
        label,
        bytes,
        value,
    }
}

fn decode_payload(bytes: &[u8]) -> Result<Value, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
    serde_json::from_str(text).map_err(|e| e.to_string())
}

pub fn open_store_or_exit(path: &str, json_output: bool) -> JsonlImportStore {
    JsonlImportStore::open(path).unwrap_or_else(|e| {
        fail(
            ERROR_INTERNAL,
            "Failed to open token version store.",
            json!({"store": path, "reason": e.to_string()}),
            json_output,
        )
    })
}

pub fn render_json(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("error: failed to render json: {e}");
        std::process::exit(1);
    })
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
