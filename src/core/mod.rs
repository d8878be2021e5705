//! Core logger types and traits

pub mod encoder;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod logger;
pub mod pipeline;
pub mod severity;
pub mod sink;

pub use encoder::{Encoder, EncoderConfig, LevelEncoding, TimeEncoding};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{Caller, LogEntry};
pub use logger::Logger;
pub use pipeline::Pipeline;
pub use severity::Severity;
pub use sink::{IoSink, WriteSink};
