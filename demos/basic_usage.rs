//! Basic logger usage example
//!
//! Demonstrates the default console logger, per-output levels and encoders,
//! structured fields and the logging macros.
//!
//! Run with: cargo run --example basic_usage

use tee_logger::prelude::*;
use tee_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Tee Logger - Basic Usage Example ===\n");

    println!("1. Default logger (console, info):");
    let logger = tee_logger::new(None)?;
    logger.debug("This debug message is filtered");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Two console outputs with their own levels and encoders:");
    let option = LoggerOption::new()
        .with_name("demo")
        .with_level("debug")
        .with_output(OutputOption::new("console").with_level_encoder("capitalColor"))
        .with_output(
            OutputOption::new("console")
                .with_level("warn")
                .with_format("json")
                .with_option("error", true),
        );
    let logger = tee_logger::new(Some(option))?;
    logger.debug("Only the first output sees this");
    logger.warn("Both outputs see this; the second writes JSON to stderr");

    println!("\n3. Structured fields and caller capture:");
    let logger = tee_logger::new(Some(
        LoggerOption::new().with_name("http").with_caller(true),
    ))?;
    logger.log_with_context(
        Severity::Info,
        "request served",
        LogContext::new()
            .with_field("method", "GET")
            .with_field("status", 200)
            .with_field("elapsed", std::time::Duration::from_millis(37)),
    );

    println!("\n4. Macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "Retry attempt {} of {}", 3, 5);

    logger.sync()?;
    println!("\n=== Example completed successfully ===");
    Ok(())
}
