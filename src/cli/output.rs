use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::error::{ErrorCode, FitError, Result, StructuredError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Newline-delimited JSON (one object per line)
    Jsonl,
    /// Plain text without colors or formatting
    Plain,
    /// Tab-separated values (for shell scripting)
    Tsv,
}

impl OutputFormat {
    /// Determine format from CLI args (robot flag overrides explicit format)
    #[must_use]
    pub fn from_args(robot: bool, format: Option<Self>) -> Self {
        if robot {
            Self::Json
        } else {
            format.unwrap_or_default()
        }
    }

    /// Check if this format should use colors
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this format is machine-readable
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl | Self::Tsv)
    }
}

#[derive(Debug, Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> RobotResponse<T> {
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    /// Rich error with structured information
    #[serde(rename = "error")]
    StructuredError {
        /// Error code enum value (e.g., "INVALID_INPUT")
        code: ErrorCode,
        /// Numeric error code (e.g., 101)
        numeric_code: u16,
        /// Human-readable error message
        message: String,
        /// Actionable suggestion for recovery
        suggestion: String,
        /// Additional context for debugging
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        /// Whether this error is recoverable by the user
        recoverable: bool,
        /// Error category (e.g., "input", "config")
        category: String,
    },
    /// Some jobs of a batch did not complete
    Partial {
        completed: usize,
        failed: usize,
        timed_out: usize,
    },
}

fn envelope<T>(status: RobotStatus, data: T) -> RobotResponse<T> {
    RobotResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    envelope(RobotStatus::Ok, data)
}

pub fn robot_partial<T: Serialize>(
    data: T,
    completed: usize,
    failed: usize,
    timed_out: usize,
) -> RobotResponse<T> {
    envelope(
        RobotStatus::Partial {
            completed,
            failed,
            timed_out,
        },
        data,
    )
}

/// Create a robot error response from a [`FitError`] with structured information.
pub fn robot_error_structured(err: &FitError) -> RobotResponse<serde_json::Value> {
    robot_error_from_structured(err.to_structured())
}

/// Create a robot error response from a [`StructuredError`].
pub fn robot_error_from_structured(err: StructuredError) -> RobotResponse<serde_json::Value> {
    envelope(RobotStatus::from(err), serde_json::Value::Null)
}

impl From<StructuredError> for RobotStatus {
    fn from(err: StructuredError) -> Self {
        Self::StructuredError {
            code: err.code,
            numeric_code: err.numeric_code,
            message: err.message,
            suggestion: err.suggestion,
            context: err.context,
            recoverable: err.recoverable,
            category: err.category,
        }
    }
}

impl From<&FitError> for RobotStatus {
    fn from(err: &FitError) -> Self {
        err.to_structured().into()
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| FitError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Emit a slice of items in JSONL format (one JSON object per line)
pub fn emit_jsonl<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        let json = serde_json::to_string(item)
            .map_err(|e| FitError::Serialization(format!("serialize output: {e}")))?;
        println!("{json}");
    }
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        self.lines.push(format!(
            "{:width$} {value}",
            style(key).dim(),
            width = self.key_width
        ));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

/// Trait for types that can format themselves for different output modes
pub trait Formattable {
    /// Format this value for the given output format
    fn format(&self, fmt: OutputFormat) -> String;
}

/// Emit a formattable value to stdout
pub fn emit<T: Formattable>(value: &T, format: OutputFormat) {
    println!("{}", value.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_args_robot_overrides() {
        assert_eq!(
            OutputFormat::from_args(true, Some(OutputFormat::Plain)),
            OutputFormat::Json
        );
    }

    #[test]
    fn output_format_from_args_uses_explicit() {
        assert_eq!(
            OutputFormat::from_args(false, Some(OutputFormat::Jsonl)),
            OutputFormat::Jsonl
        );
        assert_eq!(OutputFormat::from_args(false, None), OutputFormat::Human);
    }

    #[test]
    fn output_format_flags() {
        assert!(OutputFormat::Human.use_colors());
        assert!(!OutputFormat::Tsv.use_colors());
        assert!(!OutputFormat::Human.is_machine_readable());
        assert!(!OutputFormat::Plain.is_machine_readable());
        assert!(OutputFormat::Tsv.is_machine_readable());
    }

    #[test]
    fn robot_error_structured_includes_all_fields() {
        let err = FitError::InvalidInput("k must be at least 1".into());
        let response = robot_error_structured(&err);

        match response.status {
            RobotStatus::StructuredError {
                code,
                numeric_code,
                message,
                suggestion,
                recoverable,
                category,
                ..
            } => {
                assert_eq!(code, ErrorCode::InvalidInput);
                assert_eq!(numeric_code, 101);
                assert!(message.contains("k must be"));
                assert!(suggestion.contains("-k"));
                assert!(recoverable);
                assert_eq!(category, "input");
            }
            other => panic!("Expected StructuredError status, got {other:?}"),
        }
    }

    #[test]
    fn robot_error_serialization() {
        let err = FitError::Config("bad config".into());
        let json = serde_json::to_string(&robot_error_structured(&err)).unwrap();
        assert!(json.contains("CONFIG_INVALID"));
        assert!(json.contains("\"numeric_code\":302"));
        assert!(json.contains("\"category\":\"config\""));
    }

    #[test]
    fn robot_partial_status() {
        let response = robot_partial(serde_json::json!([]), 2, 1, 1);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"]["partial"]["completed"], 2);
        assert_eq!(json["status"]["partial"]["timed_out"], 1);
    }

    #[test]
    fn human_layout_builds_lines() {
        let mut layout = HumanLayout::new();
        layout.section("Pool").bullet("A: 3 units");
        let text = layout.build();
        assert!(text.contains("A: 3 units"));
        assert!(text.contains("----"));
    }
}
