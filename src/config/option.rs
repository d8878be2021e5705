//! Declarative logger options
//!
//! Every type here deserializes from partial configuration: missing keys stay
//! unset (`None`) and are filled later by the resolver. Keys are camelCase.
//!
//! ```
//! use tee_logger::LoggerOption;
//!
//! let option = LoggerOption::from_json_str(r#"{
//!     "name": "billing",
//!     "level": "debug",
//!     "format": "json",
//!     "output": [
//!         { "writer": "console", "levelEncoder": "capitalColor", "format": "console" },
//!         { "writer": "file", "level": "error", "option": { "filename": "billing.log" } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(option.outputs.len(), 2);
//! assert_eq!(option.defaults.level.as_deref(), Some("debug"));
//! ```

use crate::core::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Free-form option bag handed verbatim to a writer constructor
pub type WriterOptions = serde_json::Map<String, serde_json::Value>;

/// Every per-output field, each optional.
///
/// `None` is unset and inherits; `Some("")` is an explicit empty value and is
/// kept. An explicitly empty key leaves that element out of encoded records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSettings {
    pub level: Option<String>,
    /// `json`, anything else is console text
    pub format: Option<String>,
    pub message_key: Option<String>,
    pub level_key: Option<String>,
    pub time_key: Option<String>,
    pub name_key: Option<String>,
    pub caller_key: Option<String>,
    pub function_key: Option<String>,
    pub stacktrace_key: Option<String>,
    pub line_ending: Option<String>,
    /// `capital`, `capitalColor`, `lowerColor`, anything else is lowercase
    pub level_encoder: Option<String>,
    /// chrono strftime layout
    #[serde(alias = "encodeTimeFormat")]
    pub time_format: Option<String>,
}

/// One destination: writer kind, per-output overrides, writer option bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOption {
    /// Registered writer kind; unset means `console`
    pub writer: Option<String>,
    #[serde(flatten)]
    pub settings: OutputSettings,
    #[serde(rename = "option", alias = "options", alias = "writerOptions")]
    pub options: WriterOptions,
}

impl OutputOption {
    pub fn new(writer: impl Into<String>) -> Self {
        Self {
            writer: Some(writer.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.settings.level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.settings.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_level_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.settings.level_encoder = Some(encoder.into());
        self
    }

    /// Add an entry to the writer option bag
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Options for one logger: identity, outputs and defaults for every output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerOption {
    pub name: String,
    /// Registration order of the outputs; an empty list means one console output
    #[serde(rename = "output", alias = "outputs")]
    pub outputs: Vec<OutputOption>,
    /// Record the call site of every record
    #[serde(alias = "showLine")]
    pub caller: bool,
    /// `Some(false)` turns stack trace capture off entirely
    pub stacktrace: Option<bool>,
    /// Strip level colors from every output that is not `console`
    pub color_only_console: bool,
    #[serde(flatten)]
    pub defaults: OutputSettings,
}

impl LoggerOption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON options file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        serde_json::from_str(&content).map_err(|e| {
            LoggerError::config("logger configuration", format!("{}: {}", path.display(), e))
        })
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputOption) -> Self {
        self.outputs.push(output);
        self
    }

    #[must_use]
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.caller = enabled;
        self
    }

    #[must_use]
    pub fn with_stacktrace(mut self, enabled: bool) -> Self {
        self.stacktrace = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_color_only_console(mut self, enabled: bool) -> Self {
        self.color_only_console = enabled;
        self
    }

    /// Default level for outputs without their own
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.defaults.level = Some(level.into());
        self
    }

    /// Default format for outputs without their own
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.defaults.format = Some(format.into());
        self
    }

    /// Default level encoder for outputs without their own
    #[must_use]
    pub fn with_level_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.defaults.level_encoder = Some(encoder.into());
        self
    }
}
