//! Console writer: standard output, or standard error on request

use super::{decode_options, WriterOptions};
use crate::core::error::Result;
use crate::core::sink::WriteSink;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Options understood by the `console` writer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleWriterOptions {
    /// Write to standard error instead of standard output
    pub error: bool,
}

pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl WriteSink for ConsoleSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(buf)?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(buf)?,
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}

/// `console` writer constructor: `{"error": true}` selects standard error
pub fn console_writer(options: &WriterOptions) -> Result<Box<dyn WriteSink>> {
    let options: ConsoleWriterOptions = decode_options(options);
    let target = if options.error {
        ConsoleTarget::Stderr
    } else {
        ConsoleTarget::Stdout
    };
    Ok(Box::new(ConsoleSink::new(target)))
}
