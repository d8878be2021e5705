//! # Tee Logger
//!
//! A logger factory that fans each record out to several independently
//! configured outputs.
//!
//! ## Features
//!
//! - **Multiple Outputs**: each output has its own writer, level, format and keys
//! - **Layered Options**: built-in defaults, then logger-wide defaults, then per output
//! - **Pluggable Writers**: `console` and `file` built in, more via [`writers::register_writer`]
//! - **Size Rotation**: the `file` writer rotates, prunes and gzips when `maxSize` is set
//! - **`log` Facade**: [`Logger::install`] routes `log::info!` and friends
//!
//! ## Example
//!
//! ```
//! use tee_logger::{LoggerOption, OutputOption};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let option = LoggerOption::new()
//!     .with_name("api")
//!     .with_level("debug")
//!     .with_output(OutputOption::new("console").with_level("info"))
//!     .with_output(
//!         OutputOption::new("file")
//!             .with_level("error")
//!             .with_format("json")
//!             .with_option("path", dir.path().to_str().unwrap())
//!             .with_option("filename", "api.log"),
//!     );
//!
//! let logger = tee_logger::new(Some(option)).unwrap();
//! logger.info("listening");
//! logger.error("upstream unavailable");
//! ```

pub mod config;
pub mod core;
pub mod factory;
mod log_bridge;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::config::{LoggerOption, OutputOption, OutputSettings, WriterOptions};
    pub use crate::core::{
        Caller, FieldValue, LogContext, LogEntry, Logger, LoggerError, Result, Severity,
        WriteSink,
    };
    pub use crate::factory::LoggerBuilder;
    pub use crate::writers::WriterRegistry;
}

pub use crate::config::{LoggerOption, OutputOption, OutputSettings, WriterOptions};
pub use crate::core::{
    Caller, Encoder, EncoderConfig, FieldValue, IoSink, LevelEncoding, LogContext, LogEntry,
    Logger, LoggerError, Pipeline, Result, Severity, TimeEncoding, WriteSink,
};
pub use crate::factory::{new, LoggerBuilder};
pub use crate::writers::WriterRegistry;
