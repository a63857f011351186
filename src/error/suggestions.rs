//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! mention the offending path or parameter.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::ImportFailed => suggest_import_failed(context),
        ErrorCode::InvalidInput => suggest_invalid_input(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing(context),
        _ => code.suggestion().to_string(),
    }
}

fn context_str<'a>(context: Option<&'a Value>, key: &str) -> Option<&'a str> {
    context.and_then(|c| c.get(key)).and_then(Value::as_str)
}

fn suggest_import_failed(context: Option<&Value>) -> String {
    match context_str(context, "path") {
        Some(path) => format!(
            "Check '{path}'. {}",
            ErrorCode::ImportFailed.suggestion()
        ),
        None => ErrorCode::ImportFailed.suggestion().to_string(),
    }
}

fn suggest_invalid_input(context: Option<&Value>) -> String {
    let Some(reason) = context_str(context, "reason") else {
        return ErrorCode::InvalidInput.suggestion().to_string();
    };
    if reason.contains("target") {
        "Pass --target with a finite number greater than zero".to_string()
    } else if reason.contains("k ") || reason.starts_with('k') {
        "Pass -k with a value of at least 1".to_string()
    } else if reason.contains("size") {
        "Size bounds must be finite, positive and satisfy --min-size <= --max-size".to_string()
    } else {
        ErrorCode::InvalidInput.suggestion().to_string()
    }
}

fn suggest_config_missing(context: Option<&Value>) -> String {
    match context_str(context, "config_key") {
        Some(key) => format!("Set `{key}` in fitpick.toml or pass the matching flag"),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}
