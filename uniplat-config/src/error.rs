//! Typed error variants for the uniplat-config crate.
//!
//! Load/save entry points return `anyhow::Result`; callers that want to match
//! on a specific failure mode can `downcast_ref::<ConfigError>()`.

use thiserror::Error;

/// Errors that can occur when loading or saving configuration and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing a file.
    #[error("I/O error accessing config: {0}")]
    Io(#[from] std::io::Error),

    /// The file contained invalid TOML.
    #[error("TOML parse error in config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory value could not be encoded as TOML.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
