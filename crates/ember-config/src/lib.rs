//! Preset management for the ember saturator.
//!
//! A preset is a flat TOML document holding every [`SaturatorParams`]
//! field plus a name and description. Enumerated controls are stored in
//! their portable forms: the algorithm as its stable id, the post slope in
//! dB/oct and the quality as an oversampling factor.
//!
//! # Features
//!
//! - **Preset files**: Load and save presets as TOML
//! - **Validation**: Unknown ids and out-of-range values are rejected when
//!   converting to [`SaturatorParams`]
//! - **Factory presets**: A bundled set of starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use ember_config::{Preset, get_factory_preset};
//!
//! let preset = get_factory_preset("warm tape").unwrap();
//! let params = preset.to_params().unwrap();
//!
//! let mut mine = Preset::from_params("My Tape", &params);
//! mine.drive_db += 3.0;
//! mine.save("presets/my_tape.toml").unwrap();
//! ```
//!
//! [`SaturatorParams`]: ember_effects::SaturatorParams

mod error;
mod preset;

/// Parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::Preset;
