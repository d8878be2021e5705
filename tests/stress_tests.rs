//! Stress tests for fan-out logging under load
//!
//! These tests verify:
//! - No record is lost across size rotations under concurrent logging
//! - Backup pruning holds while rotations happen back to back
//! - A panicking sink does not stop the other outputs

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tee_logger::{
    IoSink, Logger, LoggerError, LoggerOption, OutputOption, Result, WriteSink, WriterRegistry,
};
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 2_500;

fn rotating_output(dir: &Path, max_backups: u64) -> OutputOption {
    OutputOption::new("file")
        .with_format("json")
        .with_option("path", dir.to_str().expect("utf-8 temp path"))
        .with_option("filename", "stress.log")
        .with_option("maxSize", 1)
        .with_option("maxBackups", max_backups)
        .with_option("compress", false)
}

fn log_concurrently(logger: Arc<Logger>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..RECORDS_PER_THREAD {
                    logger.info(format!(
                        "thread {:02} record {:05} padding padding padding padding padding",
                        t, i
                    ));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
    logger.sync().expect("Failed to sync");
}

fn log_files(dir: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .expect("read temp dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("stress"))
                .unwrap_or(false)
        })
        .collect()
}

#[test]
fn test_no_records_lost_across_rotations() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let option = LoggerOption::new().with_output(rotating_output(temp_dir.path(), 0));
    let logger = Arc::new(tee_logger::new(Some(option)).expect("logger"));

    log_concurrently(Arc::clone(&logger));

    let files = log_files(temp_dir.path());
    assert!(files.len() >= 2, "expected at least one rotation, got {:?}", files);

    let mut total = 0;
    for file in &files {
        let content = fs::read_to_string(file).expect("read log file");
        assert!(content.len() as u64 <= 1024 * 1024);
        for line in content.lines() {
            serde_json::from_str::<serde_json::Value>(line).expect("whole JSON record");
            total += 1;
        }
    }
    assert_eq!(total, THREADS * RECORDS_PER_THREAD);
}

#[test]
fn test_backup_limit_holds_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let option = LoggerOption::new().with_output(rotating_output(temp_dir.path(), 1));
    let logger = Arc::new(tee_logger::new(Some(option)).expect("logger"));

    log_concurrently(logger);

    // Active file plus one backup
    let files = log_files(temp_dir.path());
    assert_eq!(files.len(), 2, "{:?}", files);
}

struct PanickingSink;

impl WriteSink for PanickingSink {
    fn write_all(&mut self, _buf: &[u8]) -> Result<()> {
        panic!("sink exploded");
    }

    fn sync(&mut self) -> Result<()> {
        Err(LoggerError::writer("nothing to sync"))
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[derive(Clone, Default)]
struct CountingWriter(Arc<AtomicUsize>);

impl std::io::Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.fetch_add(buf.iter().filter(|b| **b == b'\n').count(), Ordering::SeqCst);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_panicking_sink_is_isolated() {
    let counter = CountingWriter::default();
    let sink = counter.clone();

    let mut registry = WriterRegistry::new();
    registry.register("boom", |_| Ok(Box::new(PanickingSink) as Box<dyn WriteSink>));
    registry.register("count", move |_| {
        Ok(Box::new(IoSink::new("count", sink.clone())) as Box<dyn WriteSink>)
    });

    let logger = Arc::new(
        Logger::builder()
            .option(
                LoggerOption::new()
                    .with_output(OutputOption::new("boom"))
                    .with_output(OutputOption::new("count")),
            )
            .registry(registry)
            .build()
            .expect("logger"),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..100 {
                    logger.warn(format!("thread {} record {}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("a sink panic escaped the logger");
    }

    assert_eq!(counter.0.load(Ordering::SeqCst), 400);
    assert!(logger.sync().is_err());
}
