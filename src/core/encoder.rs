//! Record encoders
//!
//! Two encodings share one [`EncoderConfig`]:
//! - `Json`: one single-line JSON object per record
//! - `Console`: tab-separated human-readable line
//!
//! Field names, the line ending, level rendering and timestamp rendering all
//! come from the config. An empty key leaves its element out of the record.

use super::log_entry::LogEntry;
use super::severity::Severity;
use crate::config::ResolvedSettings;
use chrono::{DateTime, Local};
use colored::Colorize;
use std::fmt::Write as _;

/// How the severity of a record is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelEncoding {
    /// `info`
    #[default]
    Lowercase,
    /// `INFO`
    Capital,
    /// `INFO` wrapped in ANSI color
    CapitalColor,
    /// `info` wrapped in ANSI color
    LowercaseColor,
}

impl LevelEncoding {
    /// Select an encoding by exact name: `capital`, `capitalColor`,
    /// `lowerColor`. Anything else is lowercase.
    pub fn from_name(name: &str) -> Self {
        match name {
            "capital" => LevelEncoding::Capital,
            "capitalColor" => LevelEncoding::CapitalColor,
            "lowerColor" => LevelEncoding::LowercaseColor,
            _ => LevelEncoding::Lowercase,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelEncoding::Lowercase => "lower",
            LevelEncoding::Capital => "capital",
            LevelEncoding::CapitalColor => "capitalColor",
            LevelEncoding::LowercaseColor => "lowerColor",
        }
    }

    pub fn is_colored(&self) -> bool {
        matches!(
            self,
            LevelEncoding::CapitalColor | LevelEncoding::LowercaseColor
        )
    }

    /// Same casing, no color
    #[must_use]
    pub fn without_color(self) -> Self {
        match self {
            LevelEncoding::CapitalColor => LevelEncoding::Capital,
            LevelEncoding::LowercaseColor => LevelEncoding::Lowercase,
            other => other,
        }
    }

    pub fn encode(&self, severity: Severity) -> String {
        match self {
            LevelEncoding::Lowercase => severity.as_str().to_string(),
            LevelEncoding::Capital => severity.as_capital_str().to_string(),
            LevelEncoding::CapitalColor => severity
                .as_capital_str()
                .color(severity.color_code())
                .to_string(),
            LevelEncoding::LowercaseColor => {
                severity.as_str().color(severity.color_code()).to_string()
            }
        }
    }
}

/// How the timestamp of a record is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeEncoding {
    /// chrono strftime layout, e.g. `%Y/%m/%d %H:%M:%S%.3f`
    Layout(String),
    /// Floating-point seconds since the Unix epoch
    Epoch,
}

impl TimeEncoding {
    /// A non-empty layout formats with it; an empty one falls back to `Epoch`.
    pub fn from_layout(layout: &str) -> Self {
        if layout.is_empty() {
            TimeEncoding::Epoch
        } else {
            TimeEncoding::Layout(layout.to_string())
        }
    }

    /// Render as a string. An unparseable layout degrades to RFC 3339.
    pub fn format(&self, timestamp: &DateTime<Local>) -> String {
        match self {
            TimeEncoding::Layout(layout) => {
                let mut out = String::new();
                if write!(out, "{}", timestamp.format(layout)).is_err() {
                    out.clear();
                    out.push_str(&timestamp.to_rfc3339());
                }
                out
            }
            TimeEncoding::Epoch => epoch_seconds(timestamp).to_string(),
        }
    }

    fn to_json_value(&self, timestamp: &DateTime<Local>) -> serde_json::Value {
        match self {
            TimeEncoding::Layout(_) => serde_json::Value::String(self.format(timestamp)),
            TimeEncoding::Epoch => serde_json::Number::from_f64(epoch_seconds(timestamp))
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

fn epoch_seconds(timestamp: &DateTime<Local>) -> f64 {
    timestamp.timestamp_micros() as f64 / 1_000_000.0
}

/// Field naming and rendering shared by both encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub function_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
}

impl EncoderConfig {
    pub fn from_settings(settings: &ResolvedSettings) -> Self {
        Self {
            message_key: settings.message_key.clone(),
            level_key: settings.level_key.clone(),
            time_key: settings.time_key.clone(),
            name_key: settings.name_key.clone(),
            caller_key: settings.caller_key.clone(),
            function_key: settings.function_key.clone(),
            stacktrace_key: settings.stacktrace_key.clone(),
            line_ending: settings.line_ending.clone(),
            level_encoding: LevelEncoding::from_name(&settings.level_encoder),
            time_encoding: TimeEncoding::from_layout(&settings.time_format),
        }
    }
}

/// Turns a [`LogEntry`] into one encoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    Json(EncoderConfig),
    Console(EncoderConfig),
}

impl Encoder {
    /// JSON when `format` is `json` (any case), console otherwise
    pub fn build(settings: &ResolvedSettings) -> Self {
        let config = EncoderConfig::from_settings(settings);
        if settings.format.eq_ignore_ascii_case("json") {
            Encoder::Json(config)
        } else {
            Encoder::Console(config)
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        match self {
            Encoder::Json(config) | Encoder::Console(config) => config,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Encoder::Json(_))
    }

    /// Encode one record, line ending included
    pub fn encode(&self, entry: &LogEntry) -> String {
        match self {
            Encoder::Json(config) => encode_json(config, entry),
            Encoder::Console(config) => encode_console(config, entry),
        }
    }
}

fn encode_json(config: &EncoderConfig, entry: &LogEntry) -> String {
    use serde_json::Value;

    let mut obj = serde_json::Map::new();

    if !config.level_key.is_empty() {
        obj.insert(
            config.level_key.clone(),
            Value::String(config.level_encoding.encode(entry.severity)),
        );
    }
    if !config.time_key.is_empty() {
        obj.insert(
            config.time_key.clone(),
            config.time_encoding.to_json_value(&entry.timestamp),
        );
    }
    if !config.name_key.is_empty() {
        obj.insert(
            config.name_key.clone(),
            Value::String(entry.logger_name.clone()),
        );
    }
    if let Some(ref caller) = entry.caller {
        if !config.caller_key.is_empty() {
            obj.insert(config.caller_key.clone(), Value::String(caller.to_string()));
        }
    }
    if let Some(ref function) = entry.function {
        if !config.function_key.is_empty() {
            obj.insert(config.function_key.clone(), Value::String(function.clone()));
        }
    }
    if !config.message_key.is_empty() {
        obj.insert(
            config.message_key.clone(),
            Value::String(entry.message.clone()),
        );
    }
    if let Some(ref stack) = entry.stacktrace {
        if !config.stacktrace_key.is_empty() {
            obj.insert(config.stacktrace_key.clone(), Value::String(stack.clone()));
        }
    }
    for (key, value) in entry.context.fields() {
        obj.insert(key.to_string(), value.to_json_value());
    }

    let mut line = serde_json::to_string(&Value::Object(obj)).unwrap_or_default();
    line.push_str(&config.line_ending);
    line
}

fn encode_console(config: &EncoderConfig, entry: &LogEntry) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(7);

    if !config.time_key.is_empty() {
        parts.push(config.time_encoding.format(&entry.timestamp));
    }
    if !config.level_key.is_empty() {
        parts.push(config.level_encoding.encode(entry.severity));
    }
    if !config.name_key.is_empty() && !entry.logger_name.is_empty() {
        parts.push(sanitize_message(&entry.logger_name));
    }
    if let Some(ref caller) = entry.caller {
        if !config.caller_key.is_empty() {
            parts.push(caller.to_string());
        }
    }
    if let Some(ref function) = entry.function {
        if !config.function_key.is_empty() {
            parts.push(function.clone());
        }
    }
    if !config.message_key.is_empty() {
        parts.push(sanitize_message(&entry.message));
    }
    if !entry.context.is_empty() {
        let fields = serde_json::Value::Object(entry.context.to_json_object());
        parts.push(fields.to_string());
    }

    let mut line = parts.join("\t");
    if let Some(ref stack) = entry.stacktrace {
        if !config.stacktrace_key.is_empty() {
            for frame in stack.trim_end().lines() {
                line.push_str(&config.line_ending);
                line.push_str(frame.trim_end_matches('\r'));
            }
        }
    }
    line.push_str(&config.line_ending);
    line
}

/// Escape line breaks and tabs so one record stays one console line
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggerOption, OutputOption, OutputSettings};
    use crate::core::log_context::LogContext;
    use crate::core::log_entry::Caller;
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_timestamp() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    fn settings_with(overrides: OutputSettings) -> ResolvedSettings {
        let global = crate::config::resolve_global(LoggerOption::default());
        let output = OutputOption {
            settings: overrides,
            ..OutputOption::default()
        };
        crate::config::resolve_output(&global, &output).settings
    }

    fn entry() -> LogEntry {
        LogEntry::new(Severity::Info, "request served")
            .with_logger_name("api")
            .with_timestamp(fixed_timestamp())
    }

    #[test]
    fn test_format_selects_encoder() {
        let json = Encoder::build(&settings_with(OutputSettings {
            format: Some("JSON".to_string()),
            ..OutputSettings::default()
        }));
        assert!(json.is_json());

        let text = Encoder::build(&settings_with(OutputSettings {
            format: Some("text".to_string()),
            ..OutputSettings::default()
        }));
        assert!(!text.is_json());
    }

    #[test]
    fn test_level_encoding_exact_match() {
        assert_eq!(LevelEncoding::from_name("capital"), LevelEncoding::Capital);
        assert_eq!(LevelEncoding::from_name("capitalColor"), LevelEncoding::CapitalColor);
        assert_eq!(LevelEncoding::from_name("lowerColor"), LevelEncoding::LowercaseColor);
        assert_eq!(LevelEncoding::from_name("Capital"), LevelEncoding::Lowercase);
        assert_eq!(LevelEncoding::from_name("lower"), LevelEncoding::Lowercase);
        assert_eq!(LevelEncoding::Capital.encode(Severity::Warn), "WARN");
        assert_eq!(LevelEncoding::Lowercase.encode(Severity::DPanic), "dpanic");
    }

    #[test]
    fn test_colored_level_keeps_name() {
        let rendered = LevelEncoding::CapitalColor.encode(Severity::Error);
        assert!(rendered.contains("ERROR"));
        assert_eq!(LevelEncoding::CapitalColor.without_color(), LevelEncoding::Capital);
    }

    #[test]
    fn test_json_default_keys() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            format: Some("json".to_string()),
            ..OutputSettings::default()
        }));
        let line = encoder.encode(&entry());
        assert!(line.ends_with('\n') || line.ends_with("\r\n"));

        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["time"], "2025/01/08 10:30:45.123");
        assert_eq!(parsed["name"], "api");
        assert_eq!(parsed["message"], "request served");
        assert!(parsed.get("caller").is_none());
    }

    #[test]
    fn test_json_renamed_and_omitted_keys() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            format: Some("json".to_string()),
            message_key: Some("msg".to_string()),
            time_key: Some(String::new()),
            ..OutputSettings::default()
        }));
        let line = encoder.encode(&entry());
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["msg"], "request served");
        assert!(parsed.get("message").is_none());
        assert!(parsed.get("time").is_none());
    }

    #[test]
    fn test_json_fields_caller_and_duration() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            format: Some("json".to_string()),
            ..OutputSettings::default()
        }));
        let record = entry()
            .with_caller(Caller::new("src/server.rs", 88))
            .with_context(
                LogContext::new()
                    .with_field("status", 200)
                    .with_field("elapsed", Duration::from_millis(250)),
            );
        let parsed: serde_json::Value =
            serde_json::from_str(encoder.encode(&record).trim_end()).unwrap();
        assert_eq!(parsed["caller"], "src/server.rs:88");
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["elapsed"], 0.25);
    }

    #[test]
    fn test_console_layout() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            level_encoder: Some("capital".to_string()),
            line_ending: Some("\n".to_string()),
            ..OutputSettings::default()
        }));
        let record = entry().with_context(LogContext::new().with_field("status", 200));
        let line = encoder.encode(&record);
        assert_eq!(
            line,
            "2025/01/08 10:30:45.123\tINFO\tapi\trequest served\t{\"status\":200}\n"
        );
    }

    #[test]
    fn test_console_escapes_injected_newlines() {
        let encoder = Encoder::build(&settings_with(OutputSettings::default()));
        let record = LogEntry::new(Severity::Info, "login\nERROR fake entry");
        let line = encoder.encode(&record);
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains("login\\nERROR fake entry"));
    }

    #[test]
    fn test_console_stacktrace_on_following_lines() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            line_ending: Some("\n".to_string()),
            ..OutputSettings::default()
        }));
        let record = entry().with_stacktrace("frame one\nframe two\n");
        let line = encoder.encode(&record);
        assert!(line.ends_with("request served\nframe one\nframe two\n"));
    }

    #[test]
    fn test_console_stacktrace_uses_line_ending() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            line_ending: Some("\r\n".to_string()),
            ..OutputSettings::default()
        }));
        let record = entry().with_stacktrace("frame one\nframe two\n");
        let line = encoder.encode(&record);
        assert!(line.ends_with("request served\r\nframe one\r\nframe two\r\n"));
        assert_eq!(line.matches('\n').count(), line.matches("\r\n").count());
    }

    #[test]
    fn test_console_escapes_logger_name() {
        let encoder = Encoder::build(&settings_with(OutputSettings::default()));
        let record = LogEntry::new(Severity::Info, "ready").with_logger_name("api\nFAKE");
        let line = encoder.encode(&record);
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains("api\\nFAKE"));
    }

    #[test]
    fn test_empty_time_format_uses_epoch() {
        let encoder = Encoder::build(&settings_with(OutputSettings {
            format: Some("json".to_string()),
            time_format: Some(String::new()),
            ..OutputSettings::default()
        }));
        assert_eq!(encoder.config().time_encoding, TimeEncoding::Epoch);

        let parsed: serde_json::Value =
            serde_json::from_str(encoder.encode(&entry()).trim_end()).unwrap();
        let seconds = parsed["time"].as_f64().unwrap();
        assert!((seconds - fixed_timestamp().timestamp() as f64 - 0.123).abs() < 1e-3);
    }
}
