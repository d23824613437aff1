//! Preset files on disk.

use ember_config::{ConfigError, Preset, factory_presets, get_factory_preset};
use ember_core::{Algorithm, OversampleQuality};
use ember_effects::SaturatorParams;
use tempfile::TempDir;

#[test]
fn save_then_load_preserves_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mine.toml");

    let params = SaturatorParams {
        input_gain_db: -2.5,
        algorithm: Algorithm::Pentode,
        drive_db: 13.5,
        character: 0.35,
        quality: OversampleQuality::X8,
        pre_low_cut_hz: 45.0,
        post_high_cut_hz: 11000.0,
        mix_percent: 62.5,
        safety_clip: false,
        ..SaturatorParams::default()
    };
    let preset = Preset::from_params("Mine", &params).with_description("round trip");
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
    assert_eq!(loaded.to_params().unwrap(), params);
}

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("preset.toml");
    Preset::new("Nested").save(&path).unwrap();
    assert!(path.is_file());
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn resolve_prefers_files_over_factory_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("warm_tape");
    let mut preset = Preset::new("Shadow");
    preset.drive_db = 1.0;
    preset.save(&path).unwrap();

    let from_file = Preset::resolve(path.to_str().unwrap()).unwrap();
    assert_eq!(from_file.name, "Shadow");

    let factory = Preset::resolve("warm_tape").unwrap();
    assert_eq!(factory.name, "Warm Tape");
}

#[test]
fn exported_factory_presets_reload() {
    let dir = TempDir::new().unwrap();
    for preset in factory_presets() {
        let path = dir.path().join(format!("{}.toml", preset.name));
        preset.save(&path).unwrap();
        let back = Preset::load(&path).unwrap();
        assert_eq!(back.to_params().unwrap(), preset.to_params().unwrap());
    }
    assert!(get_factory_preset("console glue").is_some());
}
