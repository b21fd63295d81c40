//! Browser logging through `console_log`.

use log::{Level, SetLoggerError};

/// Route the `log` facade to the browser console at `level`.
///
/// Fails if a global logger is already installed.
pub fn init_logging(level: Level) -> Result<(), SetLoggerError> {
    console_log::init_with_level(level)
}
