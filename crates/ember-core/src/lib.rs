//! Ember Core - saturation and filter primitives
//!
//! This crate provides the per-channel DSP of the Ember saturator: a
//! fourteen-algorithm ADAA saturation engine and a cascaded lowpass/highpass
//! filter bank, plus the smoothing, oversampling and delay building blocks
//! the channel processor wires around them. Everything runs in `f64`,
//! allocation-free on the audio path.
//!
//! # Saturation
//!
//! - [`SaturationCore`] - Sag, pre-shaping, ADAA waveshaping, post-shaping,
//!   makeup gain and DC blocking for one channel
//! - [`Algorithm`] - The fourteen transfer characteristics with stable indices
//! - [`Adaa1`] - First-order antiderivative anti-aliasing
//! - [`DcBlocker`] - First-order DC blocking highpass
//!
//! ## Filters
//!
//! - [`HighPrecisionFilter`] - 6/12/24/48 dB/oct lowpass or highpass
//! - [`FilterStage`] - One TPT state-variable section
//! - [`OnePoleFilter`] - One-pole section for the 6 dB/oct slope
//!
//! ## Around the core
//!
//! - [`Oversampler`] - Runtime 1×–16× oversampling with a Kaiser FIR
//! - [`LinearSmoothedParam`] - Linear parameter ramps
//! - [`InterpolatedDelay`] - Fractional delay for dry-path latency alignment
//!
//! ## Utilities
//!
//! - [`db_to_linear`], [`linear_to_db`], [`flush_denormal`], [`wet_dry_mix`]
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (with `alloc` for the delay line).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ember-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use ember_core::{Algorithm, FilterSlope, FilterType, HighPrecisionFilter, SaturationCore};
//!
//! let sample_rate = 96000.0;
//! let mut low_cut = HighPrecisionFilter::new();
//! let mut core = SaturationCore::new();
//! low_cut.prepare(sample_rate);
//! core.prepare(sample_rate);
//! low_cut.set_params(FilterType::HighPass, 80.0, FilterSlope::Slope24dB);
//!
//! let mut block = [0.1, 0.4, -0.3, 0.8];
//! for s in &mut block {
//!     *s = core.process(low_cut.process(*s), Algorithm::Tape, 9.0, 0.6);
//! }
//! assert!(block.iter().all(|s| s.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod adaa;
pub mod dc_blocker;
pub mod delay;
pub mod math;
pub mod one_pole;
pub mod oversample;
pub mod param;
pub mod precision_filter;
pub mod saturation;
pub mod svf;

// Re-export main types at crate root
pub use adaa::{ADAA_EPSILON, Adaa1};
pub use dc_blocker::DcBlocker;
pub use delay::InterpolatedDelay;
pub use math::{db_to_linear, flush_denormal, linear_to_db, wet_dry_mix};
pub use one_pole::OnePoleFilter;
pub use oversample::{MAX_OVERSAMPLE_FACTOR, MAX_TAPS, OversampleQuality, Oversampler};
pub use param::LinearSmoothedParam;
pub use precision_filter::{
    FilterParams, FilterSlope, FilterType, HIGHPASS_BYPASS_HZ, HighPrecisionFilter,
    LOWPASS_BYPASS_HZ, MAX_STAGES,
};
pub use saturation::{AdaaPair, Algorithm, SaturationCore, Shaper, ShaperFn};
pub use svf::{FilterStage, StageMode};
