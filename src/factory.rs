//! Builds a fan-out [`Logger`] from a [`LoggerOption`]

use crate::config::{resolve_global, resolve_output, LoggerOption, ResolvedOption, ResolvedOutput};
use crate::core::encoder::Encoder;
use crate::core::error::Result;
use crate::core::logger::Logger;
use crate::core::pipeline::Pipeline;
use crate::core::severity::Severity;
use crate::writers::{self, WriterRegistry};

/// Builder for [`Logger`]
///
/// Without a registry, writers are looked up in the process-wide registry.
///
/// ```
/// use tee_logger::{Logger, LoggerOption, OutputOption, Severity};
///
/// let dir = tempfile::tempdir().unwrap();
/// let option = LoggerOption::new()
///     .with_name("billing")
///     .with_level("debug")
///     .with_output(
///         OutputOption::new("file")
///             .with_level("error")
///             .with_option("path", dir.path().to_str().unwrap())
///             .with_option("filename", "billing.log"),
///     );
///
/// let logger = Logger::builder().option(option).build().unwrap();
/// assert_eq!(logger.name(), "billing");
/// assert_eq!(logger.pipelines()[0].level(), Severity::Error);
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    option: Option<LoggerOption>,
    registry: Option<WriterRegistry>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.option = Some(option);
        self
    }

    /// Resolve writers from `registry` instead of the process-wide one
    #[must_use]
    pub fn registry(mut self, registry: WriterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Assemble one pipeline per output, in declaration order.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedWriter` when an output names an unregistered
    /// writer kind, or with the constructor's own error when a sink cannot be
    /// built. Pipelines built before the failure are dropped.
    pub fn build(mut self) -> Result<Logger> {
        let global = resolve_global(self.option.take().unwrap_or_default());

        let mut pipelines = Vec::with_capacity(global.outputs.len());
        for output in &global.outputs {
            let resolved = resolve_output(&global, output);
            let resolved = if global.color_only_console && !resolved.is_console() {
                resolved.without_color()
            } else {
                resolved
            };
            pipelines.push(self.pipeline(resolved)?);
        }

        let stacktrace = stacktrace_level(&global, &pipelines);
        Ok(Logger::from_pipelines(global.name, pipelines)
            .with_caller(global.caller)
            .with_stacktrace(stacktrace))
    }

    fn pipeline(&self, output: ResolvedOutput) -> Result<Pipeline> {
        let constructor = match &self.registry {
            Some(registry) => registry.lookup(&output.writer)?,
            None => writers::lookup(&output.writer)?,
        };
        let sink = constructor(&output.options)?;
        let encoder = Encoder::build(&output.settings);
        let level = output.severity();
        Ok(Pipeline::new(output.writer, level, encoder, sink))
    }
}

/// Severity at which records carry a stack trace.
///
/// Outputs configured at exactly debug or error ask for traces; the highest
/// such level wins. `stacktrace: false` turns capture off, `stacktrace: true`
/// turns it on at error when no output asks.
fn stacktrace_level(global: &ResolvedOption, pipelines: &[Pipeline]) -> Option<Severity> {
    let requested = pipelines
        .iter()
        .map(Pipeline::level)
        .filter(|level| matches!(level, Severity::Debug | Severity::Error))
        .max();

    match global.stacktrace {
        Some(false) => None,
        Some(true) => requested.or(Some(Severity::Error)),
        None => requested,
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

/// Build a logger from `option`, or a single console logger at info when `None`
///
/// ```
/// let logger = tee_logger::new(None).unwrap();
/// assert_eq!(logger.pipelines().len(), 1);
/// assert_eq!(logger.pipelines()[0].writer(), "console");
/// ```
pub fn new(option: Option<LoggerOption>) -> Result<Logger> {
    let builder = LoggerBuilder::new();
    match option {
        Some(option) => builder.option(option).build(),
        None => builder.build(),
    }
}
