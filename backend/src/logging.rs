//! Logging bootstrap
//!
//! Library code logs through the `log` facade with `key=value` message
//! bodies (`event=... household=...`). Hosts that have no logger of their
//! own call [`init_logging`] once to route records to stderr.
//!
//! # Invariants
//! - Initialization happens at most once per process and never panics.
//! - Repeating the call with the same level is a no-op.
//! - Re-initialization with a different level is rejected.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Start stderr logging at `level` (trace|debug|info|warn|error)
///
/// # Errors
/// - Unsupported level string
/// - Logging already active with another level
/// - Logger backend failed to start
pub fn init_logging(level: &str) -> Result<(), String> {
    let normalized = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(normalized)
            .map_err(|err| format!("invalid log level `{normalized}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        info!(
            "event=logging_init module=core status=ok level={} version={}",
            normalized,
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level: normalized,
            _logger: logger,
        })
    })?;

    if state.level != normalized {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, normalized
        ));
    }
    Ok(())
}

/// Active level, `None` before [`init_logging`] succeeded
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

/// `debug` for debug builds, `info` for release builds
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}
