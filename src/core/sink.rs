//! Byte sink trait for encoded log records

use super::error::Result;
use std::io::Write;

/// Destination for encoded records.
///
/// Each call to `write_all` carries exactly one encoded record.
pub trait WriteSink: Send {
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;
    /// Flush buffered bytes to the underlying destination
    fn sync(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Adapts any `io::Write` into a [`WriteSink`].
///
/// ```
/// use tee_logger::{IoSink, WriteSink};
///
/// let mut sink = IoSink::new("memory", Vec::new());
/// sink.write_all(b"hello\n").unwrap();
/// assert_eq!(sink.get_ref(), b"hello\n");
/// ```
pub struct IoSink<W: Write + Send> {
    name: String,
    inner: W,
}

impl<W: Write + Send> IoSink<W> {
    pub fn new(name: impl Into<String>, inner: W) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> WriteSink for IoSink<W> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf)?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
