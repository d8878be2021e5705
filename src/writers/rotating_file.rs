//! Size-rotated log file
//!
//! When a write would push the active file past `max_bytes`, the file is
//! renamed to a timestamped backup next to it and a fresh file is opened:
//!
//! ```text
//! app.log  →  app-2025-01-08T10-30-45.123.log   (app-...log.gz when compressed)
//! ```
//!
//! After each rotation, backups beyond `max_backups` or older than `max_age`
//! are removed and the survivors are gzipped when compression is on.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::WriteSink;
use chrono::{Local, NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";
const MEGABYTE: u64 = 1024 * 1024;

/// When to rotate and what to keep
///
/// ```
/// use tee_logger::writers::RotationPolicy;
///
/// let policy = RotationPolicy::from_megabytes(100)
///     .with_max_age_days(7)
///     .with_max_backups(3)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 100 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    /// `None` keeps backups regardless of age
    pub max_age: Option<Duration>,
    /// 0 keeps every backup
    pub max_backups: usize,
    /// Stamp backups with local time instead of UTC
    pub local_time: bool,
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 100 * MEGABYTE,
            max_age: None,
            max_backups: 0,
            local_time: true,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_megabytes(megabytes: u64) -> Self {
        Self::default().with_max_bytes(megabytes.saturating_mul(MEGABYTE))
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// 0 disables age-based removal
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(self, days: u64) -> Self {
        let max_age = (days > 0).then(|| Duration::from_secs(days.saturating_mul(24 * 3600)));
        self.with_max_age(max_age)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// A backup found next to the active file
#[derive(Debug)]
struct Backup {
    path: PathBuf,
    stamp: NaiveDateTime,
    compressed: bool,
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open (or create) `path` for appending
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory or the file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let (file, current_size) = Self::open_append(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_writer(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_writer(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// (`app`, `.log`) for `app.log`; (`app`, ``) for `app`
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("logger")
            .to_string();
        let ext = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path(&self, stamp: NaiveDateTime) -> PathBuf {
        let (stem, ext) = self.name_parts();
        self.base_path.with_file_name(format!(
            "{}-{}{}",
            stem,
            stamp.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    /// Pick a backup name no existing file uses, stamped after every
    /// existing backup so pruning by stamp always removes the oldest records
    fn next_backup_path(&self) -> PathBuf {
        let mut stamp = self.policy.now();
        if let Some(newest) = self.backups().ok().and_then(|b| b.into_iter().next()) {
            stamp = stamp.max(newest.stamp + chrono::Duration::milliseconds(1));
        }
        loop {
            let candidate = self.backup_path(stamp);
            let gz = append_suffix(&candidate, COMPRESS_SUFFIX);
            if !candidate.exists() && !gz.exists() {
                return candidate;
            }
            stamp += chrono::Duration::milliseconds(1);
        }
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            let backup = self.next_backup_path();
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        if let Err(e) = self.cleanup() {
            eprintln!("[WARN] Failed to clean up rotated log files: {}", e);
        }
        Ok(())
    }

    /// Backups of this file, newest first
    fn backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list rotated log files",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let (rest, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
                Some(rest) => (rest, true),
                None => (rest, false),
            };
            let Some(stamp) = rest.strip_suffix(ext.as_str()) else {
                continue;
            };
            if let Ok(stamp) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: entry.path(),
                    stamp,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.stamp.cmp(&a.stamp));
        Ok(backups)
    }

    fn cleanup(&self) -> Result<()> {
        let mut keep = self.backups()?;
        let mut remove = Vec::new();

        if self.policy.max_backups > 0 && keep.len() > self.policy.max_backups {
            remove.extend(keep.split_off(self.policy.max_backups));
        }

        let max_age = self
            .policy
            .max_age
            .and_then(|age| chrono::Duration::from_std(age).ok());
        if let Some(max_age) = max_age {
            if let Some(cutoff) = self.policy.now().checked_sub_signed(max_age) {
                let (young, old): (Vec<_>, Vec<_>) =
                    keep.into_iter().partition(|b| b.stamp >= cutoff);
                keep = young;
                remove.extend(old);
            }
        }

        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[WARN] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in keep.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    eprintln!("[WARN] {}", e);
                }
            }
        }
        Ok(())
    }
}

impl WriteSink for RotatingFileSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        if len > self.policy.max_bytes {
            return Err(LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!(
                    "write length {} exceeds maximum file size {}",
                    len, self.policy.max_bytes
                ),
            ));
        }

        if self.current_size + len > self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    match Self::open_append(&self.base_path) {
                        Ok((file, _)) => self.writer = Some(BufWriter::new(file)),
                        Err(reopen_err) => {
                            eprintln!(
                                "[ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            return Err(e);
                        }
                    }
                }

                // Let the file grow past the limit rather than retry on every write
                self.current_size = 0;
            }
        }

        match self.writer.as_mut() {
            Some(writer) => {
                writer.write_all(buf).and_then(|_| writer.flush()).map_err(|e| {
                    LoggerError::file_writer(
                        self.base_path.display().to_string(),
                        format!("Failed to write log entry: {}", e),
                    )
                })?;
                self.current_size += len;
                Ok(())
            }
            None => Err(LoggerError::writer("Writer not initialized")),
        }
    }

    fn sync(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().map_err(|e| {
                LoggerError::file_writer(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
            writer.get_ref().sync_data().map_err(|e| {
                LoggerError::file_writer(
                    self.base_path.display().to_string(),
                    format!("Failed to sync: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let gz_path = append_suffix(path, COMPRESS_SUFFIX);
    let temp_gz_path = append_suffix(&gz_path, ".tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!(
                "Failed to create temporary compressed file: {}",
                temp_gz_path.display()
            ),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut out| out.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn small_policy(max_bytes: u64) -> RotationPolicy {
        RotationPolicy::new()
            .with_max_bytes(max_bytes)
            .with_compression(false)
    }

    #[test]
    fn test_policy_from_megabytes() {
        let policy = RotationPolicy::from_megabytes(2)
            .with_max_age_days(0)
            .with_max_backups(4);
        assert_eq!(policy.max_bytes, 2 * 1024 * 1024);
        assert_eq!(policy.max_age, None);
        assert_eq!(policy.max_backups, 4);

        let policy = RotationPolicy::new().with_max_age_days(2);
        assert_eq!(policy.max_age, Some(Duration::from_secs(2 * 24 * 3600)));
    }

    #[test]
    fn test_creation_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, "earlier\n").unwrap();

        let mut sink = RotatingFileSink::with_policy(&log_path, small_policy(1024)).unwrap();
        assert_eq!(sink.current_size(), 8);
        assert_eq!(sink.name(), "rotating_file");

        sink.write_all(b"later\n").unwrap();
        sink.sync().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_rotates_before_overflowing_write() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let mut sink = RotatingFileSink::with_policy(&log_path, small_policy(16)).unwrap();
        sink.write_all(b"first record\n").unwrap();
        sink.write_all(b"second record\n").unwrap();
        sink.sync().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "second record\n");

        let names = files_in(dir.path());
        assert_eq!(names.len(), 2);
        let backup = names.iter().find(|n| n.as_str() != "app.log").unwrap();
        assert!(backup.starts_with("app-"));
        assert!(backup.ends_with(".log"));
        assert_eq!(
            fs::read_to_string(dir.path().join(backup)).unwrap(),
            "first record\n"
        );
    }

    #[test]
    fn test_oversized_write_is_rejected() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let mut sink = RotatingFileSink::with_policy(&log_path, small_policy(4)).unwrap();
        let result = sink.write_all(b"too long for the file\n");
        assert!(matches!(result, Err(LoggerError::FileRotation { .. })));
        assert_eq!(sink.current_size(), 0);
    }

    #[test]
    fn test_max_backups_prunes_oldest() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let policy = small_policy(10).with_max_backups(2);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        for i in 0..6 {
            sink.write_all(format!("record {}\n", i).as_bytes()).unwrap();
        }
        sink.sync().unwrap();

        let names = files_in(dir.path());
        assert_eq!(names.len(), 3, "{:?}", names);

        // The newest two backups survive
        let mut contents: Vec<String> = names
            .iter()
            .filter(|n| n.as_str() != "app.log")
            .map(|n| fs::read_to_string(dir.path().join(n)).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["record 3\n", "record 4\n"]);
    }

    #[test]
    fn test_backup_after_clock_step_back_is_kept() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        let ahead = dir.path().join("app-2999-01-01T00-00-00.000.log");
        fs::write(&ahead, "from the future\n").unwrap();

        let policy = small_policy(10).with_max_backups(1);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        sink.write_all(b"record 0\n").unwrap();
        sink.write_all(b"record 1\n").unwrap();

        // The fresh backup sorts after the existing one and survives the prune
        assert!(!ahead.exists());
        let names = files_in(dir.path());
        assert_eq!(names.len(), 2, "{:?}", names);
        let backup = names.iter().find(|n| n.as_str() != "app.log").unwrap();
        assert!(backup.starts_with("app-2999-01-01T00-00-00.001"), "{}", backup);
        assert_eq!(
            fs::read_to_string(dir.path().join(backup)).unwrap(),
            "record 0\n"
        );
    }

    #[test]
    fn test_records_reach_disk_without_sync() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let mut sink = RotatingFileSink::with_policy(&log_path, small_policy(1024)).unwrap();
        sink.write_all(b"written through\n").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "written through\n");
    }

    #[test]
    fn test_max_age_removes_stale_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        let stale = dir.path().join("app-2000-01-01T00-00-00.000.log");
        let unrelated = dir.path().join("other-2000-01-01T00-00-00.000.log");
        fs::write(&stale, "old\n").unwrap();
        fs::write(&unrelated, "keep\n").unwrap();

        let policy = small_policy(10).with_max_age_days(1);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        sink.write_all(b"record 0\n").unwrap();
        sink.write_all(b"record 1\n").unwrap();

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert_eq!(files_in(dir.path()).len(), 3);
    }

    #[test]
    fn test_compression_replaces_backup() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let policy = small_policy(10).with_compression(true);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        sink.write_all(b"record 0\n").unwrap();
        sink.write_all(b"record 1\n").unwrap();

        let names = files_in(dir.path());
        let gz = names.iter().find(|n| n.ends_with(".log.gz")).unwrap();
        assert!(!names.iter().any(|n| n.ends_with(".tmp")));
        assert_eq!(names.len(), 2);

        let mut decoded = String::new();
        GzDecoder::new(File::open(dir.path().join(gz)).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "record 0\n");
    }

    #[test]
    fn test_utc_backup_names_parse() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("service");

        let policy = small_policy(10).with_local_time(false).with_max_backups(1);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        for i in 0..4 {
            sink.write_all(format!("record {}\n", i).as_bytes()).unwrap();
        }

        // Extension-less files rotate to `service-<stamp>`
        let names = files_in(dir.path());
        assert_eq!(names.len(), 2, "{:?}", names);
        assert!(names.iter().any(|n| n.starts_with("service-")));
    }
}
