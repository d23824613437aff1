//! Factory presets bundled with the ember library.
//!
//! These are embedded at compile time and always available without
//! external files. Each one leaves unlisted fields at their defaults.

use crate::Preset;

/// Internal identifiers of the factory presets.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "warm_tape",
    "console_glue",
    "fuzz_diode",
    "lofi_crush",
    "air_exciter",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("warm_tape", WARM_TAPE_PRESET),
    ("console_glue", CONSOLE_GLUE_PRESET),
    ("fuzz_diode", FUZZ_DIODE_PRESET),
    ("lofi_crush", LOFI_CRUSH_PRESET),
    ("air_exciter", AIR_EXCITER_PRESET),
];

/// Warm tape - gentle compression with rounded highs.
const WARM_TAPE_PRESET: &str = r#"
name = "Warm Tape"
description = "Gentle tape compression with a softened top end"
algorithm = "tape"
drive_db = 9.0
character = 0.6
quality = 4
pre_low_cut_hz = 30.0
post_high_cut_hz = 16000.0
post_slope = 12
output_gain_db = -3.0
"#;

/// Console glue - subtle bus saturation.
const CONSOLE_GLUE_PRESET: &str = r#"
name = "Console Glue"
description = "Subtle console-bus saturation for mix glue"
algorithm = "console"
drive_db = 6.0
character = 0.4
quality = 2
post_low_cut_hz = 25.0
post_slope = 12
mix_percent = 80.0
output_gain_db = -1.5
"#;

/// Fuzz diode - band-limited heavy clipping.
const FUZZ_DIODE_PRESET: &str = r#"
name = "Fuzz Diode"
description = "Heavy diode clipping, band-limited before and after"
algorithm = "diode"
drive_db = 20.0
character = 0.8
quality = 8
pre_low_cut_hz = 120.0
pre_high_cut_hz = 8000.0
post_high_cut_hz = 6000.0
post_slope = 24
output_gain_db = -8.0
"#;

/// Lo-fi crush - sample-and-hold with reduced resolution.
const LOFI_CRUSH_PRESET: &str = r#"
name = "Lo-Fi Crush"
description = "Reduced bit depth and sample rate, blended with the dry signal"
algorithm = "bitcrush"
drive_db = 3.0
character = 0.7
quality = 1
post_high_cut_hz = 7000.0
post_slope = 24
mix_percent = 70.0
"#;

/// Air exciter - high-band harmonics on top of the dry signal.
const AIR_EXCITER_PRESET: &str = r#"
name = "Air Exciter"
description = "Harmonic sheen on the high band, mixed under the dry signal"
algorithm = "exciter"
character = 0.5
quality = 2
pre_low_cut_hz = 2500.0
post_low_cut_hz = 3000.0
post_slope = 12
mix_percent = 35.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use ember_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use ember_config::get_factory_preset;
///
/// let a = get_factory_preset("warm_tape").unwrap();
/// let b = get_factory_preset("Warm Tape").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if *preset_name == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Whether `name` matches a factory preset identifier or display name.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_factory_presets_parse_and_validate() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESETS_TOML.len());
        for preset in &presets {
            assert!(preset.description.is_some(), "{} has no description", preset.name);
            if let Err(e) = preset.to_params() {
                panic!("{}: {e}", preset.name);
            }
        }
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(get_factory_preset("FUZZ_DIODE").unwrap().name, "Fuzz Diode");
        assert_eq!(get_factory_preset("lo-fi crush").unwrap().algorithm, "bitcrush");
        assert!(get_factory_preset("nonexistent").is_none());
        assert!(is_factory_preset("Air Exciter"));
        assert!(!is_factory_preset("Air"));
    }
}
