//! File-backed debug logging for the platform layer.
//!
//! Controlled by the `UNIPLAT_DEBUG_LEVEL` environment variable:
//! - 0 or unset: No debugging
//! - 1: Errors only
//! - 2: Info level (window lifecycle, popup outcomes)
//! - 3: Debug level (suppressed clicks, placement clamping, timer arm/fire)
//! - 4: Trace level (every translated or dropped input event)
//!
//! Output goes to `uniplat_debug.log` in the system temp directory, keeping
//! diagnostics off stdout/stderr of the host application. [`init_log_bridge`]
//! additionally routes `log` crate records into the same file.

use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        std::env::var("UNIPLAT_DEBUG_LEVEL")
            .ok()
            .and_then(|val| val.trim().parse::<u8>().ok())
            .map(Self::from_u8)
            .unwrap_or(DebugLevel::Off)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => DebugLevel::Error,
            2 => DebugLevel::Info,
            3 => DebugLevel::Debug,
            4 => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => DebugLevel::Error,
            log::Level::Warn | log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DebugLevel::Off => "OFF  ",
            DebugLevel::Error => "ERROR",
            DebugLevel::Info => "INFO ",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Trace => "TRACE",
        }
    }
}

struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new() -> Self {
        let level = DebugLevel::from_env();
        if level == DebugLevel::Off {
            return DebugLogger { level, file: None };
        }

        // Unopenable log file means logging silently stays off
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();

        let mut logger = DebugLogger { level, file };
        logger.write_raw(&format!(
            "\n{}\nuniplat debug session started at {} (level={:?})\n{}\n",
            "=".repeat(80),
            timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level == DebugLevel::Off || level > self.level {
            return;
        }
        self.write_raw(&format!(
            "[{}] [{}] [{}] {}\n",
            timestamp(),
            level.label(),
            category,
            msg
        ));
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("uniplat_debug.log")
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    level != DebugLevel::Off && level <= logger().lock().level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    logger().lock().log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

/// `log` facade implementation that writes into the debug log file.
struct LogBridge {
    mirror_stderr: bool,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = DebugLevel::from_log(record.level());
        let msg = format!("{}", record.args());
        log(level, record.target(), &msg);
        if self.mirror_stderr {
            eprintln!("[{}] [{}] {}", record.level(), record.target(), msg);
        }
    }

    fn flush(&self) {}
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Route `log` crate records into the debug log file.
///
/// `level` overrides the maximum level; otherwise it follows
/// `UNIPLAT_DEBUG_LEVEL`. Records are mirrored to stderr when `RUST_LOG` is
/// set. Calling this more than once, or after another logger was installed,
/// leaves the existing logger in place.
pub fn init_log_bridge(level: Option<log::LevelFilter>) {
    let filter = level.unwrap_or_else(|| match logger().lock().level {
        DebugLevel::Off => log::LevelFilter::Off,
        DebugLevel::Error => log::LevelFilter::Error,
        DebugLevel::Info => log::LevelFilter::Info,
        DebugLevel::Debug => log::LevelFilter::Debug,
        DebugLevel::Trace => log::LevelFilter::Trace,
    });

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
    });
    if log::set_logger(bridge).is_ok() {
        log::set_max_level(filter);
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(DebugLevel::from_u8(0), DebugLevel::Off);
        assert_eq!(DebugLevel::from_u8(3), DebugLevel::Debug);
        assert_eq!(DebugLevel::from_u8(9), DebugLevel::Off);
    }

    #[test]
    fn test_log_levels_map_onto_debug_levels() {
        assert_eq!(DebugLevel::from_log(log::Level::Warn), DebugLevel::Info);
        assert_eq!(DebugLevel::from_log(log::Level::Trace), DebugLevel::Trace);
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!is_enabled(DebugLevel::Off));
    }
}
