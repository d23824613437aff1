//! Ember Effects - the stereo saturator built on ember-core
//!
//! This crate wires the per-channel primitives of `ember-core` into a
//! complete processor:
//!
//! - [`Saturator`] - Stereo processor: input gain, pre filters, saturation,
//!   post filters, oversampling, latency-aligned dry/wet mix, output gain,
//!   safety clip and peak meters
//! - [`SaturatorParams`] - The full control set with ranges and defaults
//! - [`AutoGain`] - Three-second loudness learning window
//!
//! ## Example
//!
//! ```rust
//! use ember_core::Algorithm;
//! use ember_effects::{Saturator, SaturatorParams};
//!
//! let mut sat = Saturator::new(48000.0);
//! sat.set_params(SaturatorParams {
//!     algorithm: Algorithm::Triode,
//!     drive_db: 12.0,
//!     ..SaturatorParams::default()
//! });
//!
//! let mut left = vec![0.25f32; 256];
//! let mut right = vec![-0.25f32; 256];
//! sat.process_block(&mut left, &mut right);
//! assert!(left.iter().chain(&right).all(|s| s.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod auto_gain;
pub mod params;
pub mod saturator;

// Re-export main types at crate root
pub use auto_gain::{AutoGain, AutoGainOutcome, LEARNING_SECONDS, PEAK_CEILING, SILENCE_THRESHOLD};
pub use params::{SaturatorParams, ranges};
pub use saturator::{FILTER_UPDATE_INTERVAL, MAX_DRY_DELAY, PeakMeter, Saturator};
