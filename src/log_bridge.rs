//! Bridge from the `log` crate facade

use crate::core::error::Result;
use crate::core::log_entry::{Caller, LogEntry};
use crate::core::logger::Logger;
use crate::core::severity::Severity;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, Severity::from_log_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let severity = Severity::from_log_level(record.level());
        if !Logger::enabled(self, severity) {
            return;
        }

        let mut entry = LogEntry::new(severity, record.args().to_string());
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            entry = entry.with_caller(Caller::new(file, line));
        }
        if let Some(module) = record.module_path() {
            entry = entry.with_function(module);
        }
        self.log_entry(entry);
    }

    fn flush(&self) {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

impl Logger {
    /// Make this logger the `log` crate's global logger.
    ///
    /// The facade's max level is set to the least severe level any output
    /// accepts. Fails when a global logger is already installed.
    pub fn install(self) -> Result<()> {
        let max_level = self
            .min_level()
            .map(|level| level.to_log_level().to_level_filter())
            .unwrap_or(log::LevelFilter::Off);
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}
