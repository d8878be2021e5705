//! File writer: a plain file, or a size-rotated one when `maxSize` is set

use super::rotating_file::{RotatingFileSink, RotationPolicy};
use super::{decode_options, WriterOptions};
use crate::core::error::{LoggerError, Result};
use crate::core::sink::WriteSink;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Options understood by the `file` writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWriterOptions {
    /// Directory, created when missing
    pub path: PathBuf,
    pub filename: String,
    /// Megabytes before rotation; 0 writes one plain file
    #[serde(rename = "maxSize", alias = "maxsize", alias = "max_size")]
    pub max_size: u64,
    /// Days to keep rotated files; 0 keeps them regardless of age
    #[serde(rename = "maxAge", alias = "maxage", alias = "max_age")]
    pub max_age: u64,
    /// Rotated files to keep; 0 keeps all
    #[serde(rename = "maxBackups", alias = "maxbackups", alias = "max_backups")]
    pub max_backups: usize,
    /// Name rotated files by local time instead of UTC
    #[serde(alias = "localTime", alias = "local_time")]
    pub localtime: bool,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for FileWriterOptions {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir(),
            filename: "logger.log".to_string(),
            max_size: 0,
            max_age: 0,
            max_backups: 0,
            localtime: true,
            compress: true,
        }
    }
}

impl FileWriterOptions {
    pub fn file_path(&self) -> PathBuf {
        self.path.join(&self.filename)
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::from_megabytes(self.max_size)
            .with_max_age_days(self.max_age)
            .with_max_backups(self.max_backups)
            .with_local_time(self.localtime)
            .with_compression(self.compress)
    }
}

/// A plain log file, truncated when opened
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| {
            LoggerError::file_writer(path.display().to_string(), format!("Failed to create: {}", e))
        })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WriteSink for FileSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.file.write_all(buf).map_err(|e| {
            LoggerError::file_writer(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_data().map_err(|e| {
            LoggerError::file_writer(
                self.path.display().to_string(),
                format!("Failed to sync: {}", e),
            )
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Build the sink described by `options`
pub fn open(options: &FileWriterOptions) -> Result<Box<dyn WriteSink>> {
    if !options.path.as_os_str().is_empty() && !options.path.exists() {
        fs::create_dir_all(&options.path).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", options.path.display()),
                e,
            )
        })?;
    }

    let file_path = options.file_path();
    if options.max_size > 0 {
        let sink = RotatingFileSink::with_policy(file_path, options.rotation_policy())?;
        return Ok(Box::new(sink));
    }
    Ok(Box::new(FileSink::create(file_path)?))
}

/// `file` writer constructor
pub fn file_writer(options: &WriterOptions) -> Result<Box<dyn WriteSink>> {
    let options: FileWriterOptions = decode_options(options);
    open(&options)
}
