//! Fan-out logger over severity-filtered pipelines

use super::{
    error::Result,
    log_context::LogContext,
    log_entry::{Caller, LogEntry},
    pipeline::Pipeline,
    severity::Severity,
};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Dispatches each record to every [`Pipeline`] whose threshold it meets.
///
/// Built by [`LoggerBuilder`](crate::LoggerBuilder) or [`crate::new`]. The
/// logger owns its pipelines; sinks are flushed on [`Logger::sync`] and on drop.
///
/// ```
/// use tee_logger::{IoSink, LogContext, Logger, Severity, WriteSink, WriterRegistry};
///
/// let mut registry = WriterRegistry::new();
/// registry.register("null", |_| {
///     Ok(Box::new(IoSink::new("null", std::io::sink())) as Box<dyn WriteSink>)
/// });
///
/// let option = serde_json::from_value(serde_json::json!({
///     "name": "api",
///     "output": [{ "writer": "null", "level": "warn" }]
/// })).unwrap();
/// let logger = Logger::builder().option(option).registry(registry).build().unwrap();
///
/// assert!(!logger.enabled(Severity::Info));
/// logger.warn("cache miss rate high");
/// logger.log_with_context(Severity::Error, "upstream failed", LogContext::new().with_field("status", 502));
/// ```
pub struct Logger {
    name: String,
    pipelines: Vec<Pipeline>,
    add_caller: bool,
    stacktrace_level: Option<Severity>,
}

impl Logger {
    /// Combine pipelines into one fan-out logger
    #[must_use]
    pub fn from_pipelines(name: impl Into<String>, pipelines: Vec<Pipeline>) -> Self {
        Self {
            name: name.into(),
            pipelines,
            add_caller: false,
            stacktrace_level: None,
        }
    }

    /// Record the call site of every record
    #[must_use]
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// Capture a stack trace for records at or above `level`
    #[must_use]
    pub fn with_stacktrace(mut self, level: Option<Severity>) -> Self {
        self.stacktrace_level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn caller_enabled(&self) -> bool {
        self.add_caller
    }

    pub fn stacktrace_level(&self) -> Option<Severity> {
        self.stacktrace_level
    }

    /// Whether any pipeline accepts `severity`
    pub fn enabled(&self, severity: Severity) -> bool {
        self.pipelines.iter().any(|p| p.enabled(severity))
    }

    /// Least severe level any pipeline accepts
    pub fn min_level(&self) -> Option<Severity> {
        self.pipelines.iter().map(Pipeline::level).min()
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.log_with_context(severity, message, LogContext::new());
    }

    /// Log with structured context fields
    #[track_caller]
    pub fn log_with_context(
        &self,
        severity: Severity,
        message: impl Into<String>,
        context: LogContext,
    ) {
        if !self.enabled(severity) {
            return;
        }
        let caller = Caller::from(Location::caller());
        let entry = LogEntry::new(severity, message).with_context(context);
        self.dispatch(self.decorate(entry, Some(caller), None));
    }

    /// Entry point for the logging macros, which also know the module path
    #[doc(hidden)]
    #[track_caller]
    pub fn log_from_module(
        &self,
        severity: Severity,
        module_path: &'static str,
        message: String,
        context: LogContext,
    ) {
        if !self.enabled(severity) {
            return;
        }
        let caller = Caller::from(Location::caller());
        let entry = LogEntry::new(severity, message).with_context(context);
        self.dispatch(self.decorate(entry, Some(caller), Some(module_path)));
    }

    /// Dispatch a record built elsewhere; `caller` and `function` are kept
    /// only when caller capture is on.
    pub fn log_entry(&self, entry: LogEntry) {
        if !self.enabled(entry.severity) {
            return;
        }
        let caller = entry.caller.clone();
        let function = entry.function.clone();
        let mut entry = self.decorate(entry, caller, None);
        if self.add_caller {
            entry.function = function;
        }
        self.dispatch(entry);
    }

    fn decorate(
        &self,
        mut entry: LogEntry,
        caller: Option<Caller>,
        function: Option<&str>,
    ) -> LogEntry {
        entry.logger_name = self.name.clone();
        entry.caller = None;
        entry.function = None;
        if self.add_caller {
            entry.caller = caller;
            entry.function = function.map(str::to_string);
        }
        if let Some(level) = self.stacktrace_level {
            if entry.severity >= level {
                entry.stacktrace = Some(Backtrace::force_capture().to_string());
            }
        }
        entry
    }

    /// Write to each pipeline with per-pipeline panic isolation, so one
    /// failing sink does not keep the record from the others.
    fn dispatch(&self, entry: LogEntry) {
        for (idx, pipeline) in self.pipelines.iter().enumerate() {
            if !pipeline.enabled(entry.severity) {
                continue;
            }
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                pipeline.write(&entry)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Output #{} ({}) write failed: {}",
                        idx,
                        pipeline.writer(),
                        e
                    );
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Output #{} ({}) panicked: {}. \
                         Other outputs continue to function.",
                        idx,
                        pipeline.writer(),
                        panic_msg
                    );
                }
            }
        }
    }

    /// Flush every sink, returning the first error after trying all of them
    pub fn sync(&self) -> Result<()> {
        let mut first_err = None;
        for pipeline in &self.pipelines {
            if let Err(e) = pipeline.sync() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Log at `dpanic`; the record is written and execution continues
    #[inline]
    #[track_caller]
    pub fn dpanic(&self, message: impl Into<String>) {
        self.log(Severity::DPanic, message);
    }

    /// Log at `panic`, flush every sink, then panic with the message
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        let message = message.into();
        self.log(Severity::Panic, message.clone());
        let _ = self.sync();
        panic!("{}", message);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("pipelines", &self.pipelines)
            .field("add_caller", &self.add_caller)
            .field("stacktrace_level", &self.stacktrace_level)
            .finish()
    }
}
