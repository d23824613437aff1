//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ember_effects::{SaturatorParams, ranges};

use crate::error::ConfigError;
use crate::validation::{check_range, parse_algorithm, parse_quality, parse_slope};

/// Saturator preset.
///
/// Every field is optional in the file; missing ones take the
/// [`SaturatorParams`] defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "Warm Tape"
/// description = "Gentle tape compression"
/// algorithm = "tape"
/// drive_db = 9.0
/// character = 0.6
/// quality = 4
/// post_high_cut_hz = 16000.0
/// post_slope = 12
/// output_gain_db = -3.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Input gain, dB.
    pub input_gain_db: f64,
    /// Run an auto-gain learning window when the preset is applied.
    pub auto_gain: bool,
    /// Bypass.
    pub bypass: bool,
    /// Pre-saturation highpass, Hz.
    pub pre_low_cut_hz: f64,
    /// Pre-saturation lowpass, Hz.
    pub pre_high_cut_hz: f64,
    /// Algorithm id, e.g. `"tape"` or `"soft_tanh"`.
    pub algorithm: String,
    /// Drive, dB.
    pub drive_db: f64,
    /// Character, 0..1.
    pub character: f64,
    /// Oversampling factor: 1, 2, 4, 8 or 16.
    pub quality: u32,
    /// Post-saturation highpass, Hz.
    pub post_low_cut_hz: f64,
    /// Post-saturation lowpass, Hz.
    pub post_high_cut_hz: f64,
    /// Post filter slope in dB/oct: 6, 12, 24 or 48.
    pub post_slope: u32,
    /// Wet share, percent.
    pub mix_percent: f64,
    /// Output gain, dB.
    pub output_gain_db: f64,
    /// Clamp the output to ±1.
    pub safety_clip: bool,
}

impl Preset {
    /// Create a preset holding the default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_params(name, &SaturatorParams::default())
    }

    /// Create a preset from a parameter set.
    pub fn from_params(name: impl Into<String>, params: &SaturatorParams) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_gain_db: params.input_gain_db,
            auto_gain: params.auto_gain,
            bypass: params.bypass,
            pre_low_cut_hz: params.pre_low_cut_hz,
            pre_high_cut_hz: params.pre_high_cut_hz,
            algorithm: params.algorithm.id().to_string(),
            drive_db: params.drive_db,
            character: params.character,
            quality: params.quality.factor() as u32,
            post_low_cut_hz: params.post_low_cut_hz,
            post_high_cut_hz: params.post_high_cut_hz,
            post_slope: params.post_slope.db(),
            mix_percent: params.mix_percent,
            output_gain_db: params.output_gain_db,
            safety_clip: params.safety_clip,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate every field and build the parameter set.
    pub fn to_params(&self) -> Result<SaturatorParams, ConfigError> {
        Ok(SaturatorParams {
            input_gain_db: check_range("input_gain_db", self.input_gain_db, &ranges::GAIN_DB)?,
            auto_gain: self.auto_gain,
            bypass: self.bypass,
            pre_low_cut_hz: check_range("pre_low_cut_hz", self.pre_low_cut_hz, &ranges::CUTOFF_HZ)?,
            pre_high_cut_hz: check_range(
                "pre_high_cut_hz",
                self.pre_high_cut_hz,
                &ranges::CUTOFF_HZ,
            )?,
            algorithm: parse_algorithm(&self.algorithm)?,
            drive_db: check_range("drive_db", self.drive_db, &ranges::DRIVE_DB)?,
            character: check_range("character", self.character, &ranges::CHARACTER)?,
            quality: parse_quality(self.quality)?,
            post_low_cut_hz: check_range(
                "post_low_cut_hz",
                self.post_low_cut_hz,
                &ranges::CUTOFF_HZ,
            )?,
            post_high_cut_hz: check_range(
                "post_high_cut_hz",
                self.post_high_cut_hz,
                &ranges::CUTOFF_HZ,
            )?,
            post_slope: parse_slope(self.post_slope)?,
            mix_percent: check_range("mix_percent", self.mix_percent, &ranges::MIX_PERCENT)?,
            output_gain_db: check_range("output_gain_db", self.output_gain_db, &ranges::GAIN_DB)?,
            safety_clip: self.safety_clip,
        })
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load `name_or_path` as a file if it exists, else as a factory preset.
    pub fn resolve(name_or_path: &str) -> Result<Self, ConfigError> {
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Self::load(path);
        }
        crate::get_factory_preset(name_or_path)
            .ok_or_else(|| ConfigError::PresetNotFound(name_or_path.to_string()))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
