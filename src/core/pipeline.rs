//! Severity-filtered encode-and-write unit

use super::encoder::Encoder;
use super::error::Result;
use super::log_entry::LogEntry;
use super::severity::Severity;
use super::sink::WriteSink;
use parking_lot::Mutex;

/// One output of a [`Logger`](super::Logger): records at or above `level`
/// are encoded with `encoder` and written to the sink.
pub struct Pipeline {
    writer: String,
    level: Severity,
    encoder: Encoder,
    sink: Mutex<Box<dyn WriteSink>>,
}

impl Pipeline {
    pub fn new(
        writer: impl Into<String>,
        level: Severity,
        encoder: Encoder,
        sink: Box<dyn WriteSink>,
    ) -> Self {
        Self {
            writer: writer.into(),
            level,
            encoder,
            sink: Mutex::new(sink),
        }
    }

    /// Writer kind this pipeline was built from
    pub fn writer(&self) -> &str {
        &self.writer
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Name reported by the underlying sink
    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }

    #[inline]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Encode and write, skipping records below the threshold
    pub fn write(&self, entry: &LogEntry) -> Result<()> {
        if !self.enabled(entry.severity) {
            return Ok(());
        }
        let line = self.encoder.encode(entry);
        self.sink.lock().write_all(line.as_bytes())
    }

    pub fn sync(&self) -> Result<()> {
        self.sink.lock().sync()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("writer", &self.writer)
            .field("level", &self.level)
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}
