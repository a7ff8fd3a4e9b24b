//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! [`PlatformConfig`](crate::PlatformConfig) fields.

pub fn menu_dismiss_suppression_ms() -> u64 {
    100 // swallow the click that closed a popup menu
}

pub fn double_click_ms() -> u64 {
    500 // 500 milliseconds
}

pub fn double_click_slop() -> f64 {
    4.0 // logical pixels
}

pub fn reference_dpi() -> f64 {
    96.0
}

pub fn drop_keys_with_extra_modifiers() -> bool {
    true
}

pub fn settings_file_name() -> String {
    "settings.toml".to_string()
}
