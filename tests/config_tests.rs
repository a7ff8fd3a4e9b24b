//! Configuration loading and file-backed placement persistence.

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;
use uniplat::backend::headless::HeadlessBackend;
use uniplat::uniplat_config::FileSettings;
use uniplat::window::Rect;
use uniplat::{Platform, PlatformConfig, SettingsStore, WindowKind};

#[test]
fn test_config_round_trip_through_toml() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("uniplat.toml");

    let config = PlatformConfig {
        menu_dismiss_suppression_ms: 150,
        reference_dpi: 72.0,
        ..PlatformConfig::default()
    };
    config.save_to(&path)?;

    let loaded = PlatformConfig::load_from(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("uniplat.toml");
    std::fs::write(&path, "double_click_ms = 300\n")?;

    let loaded = PlatformConfig::load_from(&path)?;
    assert_eq!(loaded.double_click_ms, 300);
    assert_eq!(loaded.menu_dismiss_suppression_ms, 100);
    assert_eq!(loaded.reference_dpi, 96.0);
    Ok(())
}

#[test]
fn test_reference_dpi_drives_scale_factors() {
    let config = PlatformConfig {
        reference_dpi: 72.0,
        ..PlatformConfig::default()
    };
    let platform = Platform::new(
        HeadlessBackend::default(),
        config,
        Arc::new(uniplat::uniplat_config::MemorySettings::new()),
    );
    let window = platform.create_window(WindowKind::TopLevel, None);
    assert!((window.fractional_scale_factor() - 96.0 / 72.0).abs() < 1e-12);
    assert_eq!(window.integral_scale_factor(), 1);
}

#[test]
fn test_placement_survives_restart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.toml");
    let rect = Rect::new(240, 180, 1040, 780);

    {
        let backend = HeadlessBackend::default();
        let platform = Platform::new(
            backend,
            PlatformConfig::default(),
            Arc::new(FileSettings::open(&path)?),
        );
        let window = platform.create_window(WindowKind::TopLevel, None);
        window.native().move_to(rect);
        window.freeze_position("MainWindow");
    }

    let settings = Arc::new(FileSettings::open(&path)?);
    assert_eq!(settings.thaw_int("MainWindow_left", 0), 240);

    let platform = Platform::new(HeadlessBackend::default(), PlatformConfig::default(), settings);
    let window = platform.create_window(WindowKind::TopLevel, None);
    window.thaw_position("MainWindow");
    assert_eq!(window.native().placement_rect(), rect);
    Ok(())
}
