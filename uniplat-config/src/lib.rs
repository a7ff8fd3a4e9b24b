//! Configuration system for the uniplat windowing layer.
//!
//! This crate provides:
//!
//! - [`PlatformConfig`]: tunables for input normalization and scaling, loaded
//!   from and saved to a TOML file
//! - [`SettingsStore`]: the opaque key-value store that window placement
//!   freeze/thaw reads and writes, with an in-memory and a TOML-file backed
//!   implementation
//! - Default value functions used by serde

pub mod config;
pub mod defaults;
pub mod error;
pub mod settings;

pub use config::PlatformConfig;
pub use error::ConfigError;
pub use settings::{FileSettings, MemorySettings, Setting, SettingsStore};
