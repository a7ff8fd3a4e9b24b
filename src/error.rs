//! Error types for native primitive calls.
//!
//! A native call that fails leaves the toolkit handle in an unknown state, so
//! the platform layer never recovers from one: [`native_check!`] logs the
//! failing call with its source location and aborts the process.
//! Unmappable input is not an error (translation returns `None`) and usage
//! mistakes are assertions.

use thiserror::Error;

/// A native toolkit primitive could not be performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("native call `{call}` failed: {message}")]
pub struct NativeError {
    /// Name of the native primitive, e.g. `"create_window"`.
    pub call: &'static str,
    pub message: String,
}

impl NativeError {
    pub fn new(call: &'static str, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
        }
    }
}

pub type NativeResult<T> = Result<T, NativeError>;

/// Report a failed native call and abort.
#[cold]
pub fn fatal_native(expr: &str, file: &str, line: u32, err: &NativeError) -> ! {
    let diagnostic = format!("{}:{}: `{}` failed: {}", file, line, expr, err);
    log::error!("{}", diagnostic);
    crate::debug_error!("NATIVE", "{}", diagnostic);
    eprintln!("uniplat: fatal native error at {}", diagnostic);
    std::process::abort()
}

/// Evaluate a [`NativeResult`], aborting the process with a diagnostic naming
/// the call, file and line when it is an error.
#[macro_export]
macro_rules! native_check {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => $crate::error::fatal_native(stringify!($expr), file!(), line!(), &err),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_display() {
        let err = NativeError::new("create_timer", "out of handles");
        assert_eq!(
            err.to_string(),
            "native call `create_timer` failed: out of handles"
        );
    }

    #[test]
    fn test_native_check_passes_ok_through() {
        let result: NativeResult<u32> = Ok(7);
        assert_eq!(native_check!(result), 7);
    }
}
