//! Custom writer example
//!
//! Registers a writer kind that prefixes every record, then routes the `log`
//! crate facade through the resulting logger.
//!
//! Run with: cargo run --example custom_writer

use serde::Deserialize;
use std::io::Write;
use tee_logger::prelude::*;
use tee_logger::writers::{self, decode_options};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrefixOptions {
    prefix: String,
}

struct PrefixSink {
    prefix: String,
}

impl WriteSink for PrefixSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(self.prefix.as_bytes())?;
        out.write_all(buf)?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "prefix"
    }
}

fn prefix_writer(options: &WriterOptions) -> Result<Box<dyn WriteSink>> {
    let options: PrefixOptions = decode_options(options);
    if options.prefix.is_empty() {
        return Err(LoggerError::writer_construction("prefix", "prefix must not be empty"));
    }
    Ok(Box::new(PrefixSink {
        prefix: options.prefix,
    }))
}

fn main() -> Result<()> {
    println!("=== Tee Logger - Custom Writer Example ===\n");

    writers::register_writer("prefix", prefix_writer);

    println!("1. Unknown and misconfigured writers are reported:");
    let unknown = tee_logger::new(Some(
        LoggerOption::new().with_output(OutputOption::new("kafka")),
    ));
    println!("   kafka  -> {}", unknown.err().map(|e| e.to_string()).unwrap_or_default());
    let empty = tee_logger::new(Some(
        LoggerOption::new().with_output(OutputOption::new("prefix")),
    ));
    println!("   prefix -> {}", empty.err().map(|e| e.to_string()).unwrap_or_default());

    println!("\n2. Logging through the `log` facade:");
    let option = LoggerOption::new()
        .with_name("facade")
        .with_level("debug")
        .with_caller(true)
        .with_output(OutputOption::new("prefix").with_option("prefix", "[demo] "));
    tee_logger::new(Some(option))?.install()?;

    log::debug!("routed through tee_logger");
    log::info!("answer = {}", 42);
    log::Log::flush(log::logger());

    println!("\n=== Example completed successfully ===");
    Ok(())
}
