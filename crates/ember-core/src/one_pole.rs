//! One-pole filter for the 6 dB/oct slope.
//!
//! A single real pole, written as an exponential moving average:
//!
//! ```text
//! b1   = 1 - exp(-2π * freq / sample_rate)
//! z1  += b1 * (x - z1)          lowpass output = z1
//! hp   = x - z1                 highpass output
//! ```
//!
//! The coefficient is recomputed on every call. Cutoff and rate arrive per
//! sample from [`HighPrecisionFilter`](crate::HighPrecisionFilter), which
//! caches them, so there is nothing to invalidate here.
//!
//! `freq <= 0` or `freq >= sample_rate / 2` gives degenerate but finite
//! output; callers clamp upstream.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use crate::flush_denormal;
use core::f64::consts::TAU;
use libm::exp;

/// One-pole (6 dB/oct) lowpass with a derived highpass output.
///
/// # Example
///
/// ```rust
/// use ember_core::OnePoleFilter;
///
/// let mut lp = OnePoleFilter::new();
/// let y = lp.process_lp(1.0, 1000.0, 48000.0);
/// assert!(y > 0.0 && y < 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OnePoleFilter {
    z1: f64,
}

impl OnePoleFilter {
    /// Create a filter with zeroed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one sample through the lowpass.
    #[inline]
    pub fn process_lp(&mut self, input: f64, freq: f64, sample_rate: f64) -> f64 {
        let b1 = 1.0 - exp(-TAU * freq / sample_rate);
        self.z1 = flush_denormal(self.z1 + b1 * (input - self.z1));
        self.z1
    }

    /// Process one sample through the highpass (`input - lowpass`).
    #[inline]
    pub fn process_hp(&mut self, input: f64, freq: f64, sample_rate: f64) -> f64 {
        input - self.process_lp(input, freq, sample_rate)
    }

    /// Current integrator state.
    pub fn state(&self) -> f64 {
        self.z1
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
    }
}
