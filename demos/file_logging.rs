//! File logging example
//!
//! Demonstrates a plain file output next to a size-rotated JSON file, both
//! configured from a JSON document.
//!
//! Run with: cargo run --example file_logging

use std::fs;
use tee_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Tee Logger - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("tee_logger_demo");
    let config = serde_json::json!({
        "name": "file-demo",
        "level": "debug",
        "colorOnlyConsole": true,
        "levelEncoder": "capitalColor",
        "output": [
            { "writer": "console", "level": "info" },
            {
                "writer": "file",
                "option": { "path": log_dir, "filename": "plain.log" }
            },
            {
                "writer": "file",
                "level": "warn",
                "format": "json",
                "option": {
                    "path": log_dir,
                    "filename": "rotating.log",
                    "maxSize": 1,
                    "maxBackups": 3,
                    "maxAge": 7,
                    "compress": true
                }
            }
        ]
    });

    let option = LoggerOption::from_json_str(&config.to_string())?;
    let logger = tee_logger::new(Some(option))?;

    for (idx, pipeline) in logger.pipelines().iter().enumerate() {
        println!(
            "output #{}: writer={} sink={} level={}",
            idx,
            pipeline.writer(),
            pipeline.sink_name(),
            pipeline.level()
        );
    }
    println!();

    logger.debug("Written to plain.log only");
    logger.info("Written to the console and plain.log");
    for i in 0..5 {
        logger.warn(format!("Warning {} reaches every output", i));
    }
    logger.sync()?;

    println!("\nLog files in {}:", log_dir.display());
    for entry in fs::read_dir(&log_dir)?.flatten() {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        println!("  {} ({} bytes)", entry.file_name().to_string_lossy(), size);
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
