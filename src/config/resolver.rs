//! Three-tier option resolution: built-in table → global option → output
//!
//! [`resolve_global`] fills the global defaults from the built-in table and
//! returns a [`ResolvedOption`]. [`resolve_output`] only accepts that resolved
//! form, so an output can inherit built-ins solely through the global tier.

use super::defaults::DEFAULT_WRITER;
use super::option::{LoggerOption, OutputOption, OutputSettings, WriterOptions};
use crate::core::encoder::LevelEncoding;
use crate::core::severity::Severity;

/// Every per-output field, all set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub level: String,
    pub format: String,
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub function_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub level_encoder: String,
    pub time_format: String,
}

impl ResolvedSettings {
    /// Take each field from `partial` when set, from `base` otherwise
    pub fn fill(partial: &OutputSettings, base: &ResolvedSettings) -> Self {
        fn pick(value: &Option<String>, fallback: &str) -> String {
            value.clone().unwrap_or_else(|| fallback.to_string())
        }

        Self {
            level: pick(&partial.level, &base.level),
            format: pick(&partial.format, &base.format),
            message_key: pick(&partial.message_key, &base.message_key),
            level_key: pick(&partial.level_key, &base.level_key),
            time_key: pick(&partial.time_key, &base.time_key),
            name_key: pick(&partial.name_key, &base.name_key),
            caller_key: pick(&partial.caller_key, &base.caller_key),
            function_key: pick(&partial.function_key, &base.function_key),
            stacktrace_key: pick(&partial.stacktrace_key, &base.stacktrace_key),
            line_ending: pick(&partial.line_ending, &base.line_ending),
            level_encoder: pick(&partial.level_encoder, &base.level_encoder),
            time_format: pick(&partial.time_format, &base.time_format),
        }
    }

    /// Severity threshold, via the lenient mapper
    pub fn severity(&self) -> Severity {
        Severity::from_name(&self.level)
    }
}

impl From<ResolvedSettings> for OutputSettings {
    fn from(settings: ResolvedSettings) -> Self {
        Self {
            level: Some(settings.level),
            format: Some(settings.format),
            message_key: Some(settings.message_key),
            level_key: Some(settings.level_key),
            time_key: Some(settings.time_key),
            name_key: Some(settings.name_key),
            caller_key: Some(settings.caller_key),
            function_key: Some(settings.function_key),
            stacktrace_key: Some(settings.stacktrace_key),
            line_ending: Some(settings.line_ending),
            level_encoder: Some(settings.level_encoder),
            time_format: Some(settings.time_format),
        }
    }
}

/// A [`LoggerOption`] whose defaults are complete and whose output list is
/// never empty
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOption {
    pub name: String,
    pub outputs: Vec<OutputOption>,
    pub caller: bool,
    pub stacktrace: Option<bool>,
    pub color_only_console: bool,
    pub defaults: ResolvedSettings,
}

/// One output with every field filled
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutput {
    pub writer: String,
    pub settings: ResolvedSettings,
    pub options: WriterOptions,
}

impl ResolvedOutput {
    pub fn severity(&self) -> Severity {
        self.settings.severity()
    }

    pub fn is_console(&self) -> bool {
        self.writer.eq_ignore_ascii_case(DEFAULT_WRITER)
    }

    /// Replace a colored level encoder with its plain variant
    #[must_use]
    pub fn without_color(mut self) -> Self {
        let encoding = LevelEncoding::from_name(&self.settings.level_encoder);
        if encoding.is_colored() {
            self.settings.level_encoder = encoding.without_color().name().to_string();
        }
        self
    }
}

impl From<ResolvedOutput> for OutputOption {
    fn from(output: ResolvedOutput) -> Self {
        Self {
            writer: Some(output.writer),
            settings: output.settings.into(),
            options: output.options,
        }
    }
}

/// Fill every unset global default from the built-in table; an empty
/// output list becomes a single console output.
pub fn resolve_global(option: LoggerOption) -> ResolvedOption {
    let defaults = ResolvedSettings::fill(&option.defaults, &ResolvedSettings::builtin());
    let outputs = if option.outputs.is_empty() {
        vec![OutputOption::new(DEFAULT_WRITER)]
    } else {
        option.outputs
    };

    ResolvedOption {
        name: option.name,
        outputs,
        caller: option.caller,
        stacktrace: option.stacktrace,
        color_only_console: option.color_only_console,
        defaults,
    }
}

/// Fill every unset field of `output` from the resolved global defaults
pub fn resolve_output(global: &ResolvedOption, output: &OutputOption) -> ResolvedOutput {
    ResolvedOutput {
        writer: output
            .writer
            .clone()
            .unwrap_or_else(|| DEFAULT_WRITER.to_string()),
        settings: ResolvedSettings::fill(&output.settings, &global.defaults),
        options: output.options.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_global_builtins() {
        let global = resolve_global(LoggerOption::default());

        assert_eq!(global.defaults, ResolvedSettings::builtin());
        assert_eq!(global.defaults.level, "info");
        assert_eq!(global.defaults.message_key, "message");
        assert_eq!(global.defaults.stacktrace_key, "stacktrace");
        assert_eq!(global.defaults.level_encoder, "lower");
        assert_eq!(global.defaults.time_format, DEFAULT_TIME_FORMAT);
        assert_eq!(global.outputs, vec![OutputOption::new("console")]);
    }

    #[test]
    fn test_global_keeps_explicit_values() {
        let option = LoggerOption::new()
            .with_level("error")
            .with_format("json")
            .with_output(OutputOption::new("file"));
        let global = resolve_global(option);

        assert_eq!(global.defaults.level, "error");
        assert_eq!(global.defaults.format, "json");
        assert_eq!(global.defaults.time_key, DEFAULT_TIME_KEY);
        assert_eq!(global.outputs.len(), 1);
        assert_eq!(global.outputs[0].writer.as_deref(), Some("file"));
    }

    #[test]
    fn test_output_inherits_from_global() {
        let global = resolve_global(
            LoggerOption::new()
                .with_level("debug")
                .with_level_encoder("capital"),
        );
        let output = OutputOption::new("file").with_level("error");
        let resolved = resolve_output(&global, &output);

        assert_eq!(resolved.writer, "file");
        assert_eq!(resolved.severity(), Severity::Error);
        assert_eq!(resolved.settings.level_encoder, "capital");
        assert_eq!(resolved.settings.name_key, DEFAULT_NAME_KEY);
    }

    #[test]
    fn test_unset_writer_is_console() {
        let global = resolve_global(LoggerOption::default());
        let resolved = resolve_output(&global, &OutputOption::default());
        assert_eq!(resolved.writer, "console");
        assert!(resolved.is_console());
    }

    #[test]
    fn test_explicit_empty_is_kept() {
        let global = resolve_global(LoggerOption::default());
        let mut output = OutputOption::new("console");
        output.settings.caller_key = Some(String::new());
        let resolved = resolve_output(&global, &output);
        assert_eq!(resolved.settings.caller_key, "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let global = resolve_global(LoggerOption::new().with_format("json"));
        let once = resolve_output(&global, &OutputOption::new("file").with_option("path", "/tmp"));
        let twice = resolve_output(&global, &OutputOption::from(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fully_specified_output_is_unchanged() {
        let global = resolve_global(LoggerOption::new().with_level("debug"));
        let mut settings = ResolvedSettings::builtin();
        settings.level = "warn".to_string();
        settings.format = "json".to_string();
        let spec = ResolvedOutput {
            writer: "file".to_string(),
            settings,
            options: WriterOptions::new(),
        };

        assert_eq!(resolve_output(&global, &OutputOption::from(spec.clone())), spec);
    }

    #[test]
    fn test_without_color() {
        let global = resolve_global(LoggerOption::new().with_level_encoder("capitalColor"));
        let resolved = resolve_output(&global, &OutputOption::new("file")).without_color();
        assert_eq!(resolved.settings.level_encoder, "capital");

        let global = resolve_global(LoggerOption::new().with_level_encoder("lowerColor"));
        let resolved = resolve_output(&global, &OutputOption::new("file")).without_color();
        assert_eq!(resolved.settings.level_encoder, "lower");
    }
}
