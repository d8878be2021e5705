//! Severity definitions and the lenient name mapper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered importance of a log record.
///
/// `DPanic` and `Panic` sit above `Error`: a `dpanic` record is logged like
/// any other, a `panic` record is logged and then unwinds the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    DPanic = 4,
    Panic = 5,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
    ];

    /// Map a severity name to a `Severity`, case-insensitively.
    ///
    /// Unknown or empty names map to `Info`; this never fails.
    ///
    /// ```
    /// use tee_logger::Severity;
    ///
    /// assert_eq!(Severity::from_name("ERROR"), Severity::Error);
    /// assert_eq!(Severity::from_name("verbose"), Severity::Info);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Severity::Info)
    }

    /// Lowercase name, as written by the `lower` level encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
        }
    }

    /// Uppercase name, as written by the `capital` level encoding
    pub fn as_capital_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::DPanic => "DPANIC",
            Severity::Panic => "PANIC",
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Debug => Magenta,
            Severity::Info => Blue,
            Severity::Warn => Yellow,
            Severity::Error | Severity::DPanic | Severity::Panic => Red,
        }
    }

    /// Closest level of the `log` facade
    pub fn to_log_level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error | Severity::DPanic | Severity::Panic => log::Level::Error,
        }
    }

    /// Map a `log` facade level; `trace` folds into `Debug`
    pub fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warn,
            log::Level::Error => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Strict parse; see [`Severity::from_name`] for the lenient mapper.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "dpanic" => Ok(Severity::DPanic),
            "panic" => Ok(Severity::Panic),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
