//! Built-in default table
//!
//! These values are reached only through [`resolve_global`](super::resolve_global);
//! outputs inherit them via the resolved global option.

use super::resolver::ResolvedSettings;

pub const DEFAULT_WRITER: &str = "console";
pub const DEFAULT_LEVEL: &str = "info";
pub const DEFAULT_FORMAT: &str = "console";
pub const DEFAULT_MESSAGE_KEY: &str = "message";
pub const DEFAULT_LEVEL_KEY: &str = "level";
pub const DEFAULT_TIME_KEY: &str = "time";
pub const DEFAULT_NAME_KEY: &str = "name";
pub const DEFAULT_CALLER_KEY: &str = "caller";
pub const DEFAULT_FUNCTION_KEY: &str = "function";
pub const DEFAULT_STACKTRACE_KEY: &str = "stacktrace";
pub const DEFAULT_LEVEL_ENCODER: &str = "lower";
/// `2006/01/02 15:04:05.000` in strftime terms
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

#[cfg(windows)]
pub const DEFAULT_LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const DEFAULT_LINE_ENDING: &str = "\n";

impl ResolvedSettings {
    /// The built-in default for every per-output field
    pub fn builtin() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            level_key: DEFAULT_LEVEL_KEY.to_string(),
            time_key: DEFAULT_TIME_KEY.to_string(),
            name_key: DEFAULT_NAME_KEY.to_string(),
            caller_key: DEFAULT_CALLER_KEY.to_string(),
            function_key: DEFAULT_FUNCTION_KEY.to_string(),
            stacktrace_key: DEFAULT_STACKTRACE_KEY.to_string(),
            line_ending: DEFAULT_LINE_ENDING.to_string(),
            level_encoder: DEFAULT_LEVEL_ENCODER.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}
