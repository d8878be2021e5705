//! Logging macros for ergonomic log message formatting.
//!
//! These macros format like `format!` and record the invoking module as the
//! record's function when caller capture is on. The message is only
//! formatted when some output accepts the level.
//!
//! # Examples
//!
//! ```
//! use tee_logger::{info, warn};
//!
//! let logger = tee_logger::new(None).unwrap();
//!
//! info!(logger, "Server started");
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warn!(logger, "Retry attempt {} of {}", 3, 5);
//! ```

/// Log a message at an explicit [`Severity`](crate::Severity).
///
/// ```
/// # let logger = tee_logger::new(None).unwrap();
/// use tee_logger::{log, Severity};
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log_from_module(
                level,
                module_path!(),
                format!($($arg)+),
                $crate::LogContext::new(),
            );
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log at `dpanic`. Execution continues.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::DPanic, $($arg)+)
    };
}
