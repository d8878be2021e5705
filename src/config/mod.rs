//! Logger options and their resolution

pub mod defaults;
pub mod option;
pub mod resolver;

pub use option::{LoggerOption, OutputOption, OutputSettings, WriterOptions};
pub use resolver::{resolve_global, resolve_output, ResolvedOption, ResolvedOutput, ResolvedSettings};
