//! Second-order state-variable filter section.
//!
//! [`FilterStage`] is one 12 dB/oct section of the cascade inside
//! [`HighPrecisionFilter`](crate::HighPrecisionFilter). Several stages with
//! different Q values are chained to build 24 and 48 dB/oct Butterworth
//! responses.
//!
//! # Topology
//!
//! Topology-Preserving Transform (TPT) SVF after Zavalishin, "The Art of VA
//! Filter Design" (2012). Trapezoidal integrators keep the analog
//! prototype's response and stay stable while the cutoff moves, which
//! matters because the channel processor pushes smoothed cutoffs into the
//! stages every eight samples.
//!
//! ```text
//! g  = tan(π * fc / fs)        k = 1 / Q
//! v3 = x - ic2eq
//! v1 = (g * v3 + ic1eq) / (1 + g * (g + k))     bandpass
//! v2 = ic2eq + g * v1                            lowpass
//! hp = x - k * v1 - v2
//! ```
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f64::consts::PI;
use libm::tan;

use crate::flush_denormal;

/// Response selected from a [`FilterStage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageMode {
    /// Low-pass output.
    #[default]
    Lowpass,
    /// High-pass output.
    Highpass,
}

/// One 2-pole TPT state-variable section.
///
/// ## Parameters
///
/// - `cutoff`: Hz, default 1000.0. The coefficient is computed from
///   `min(cutoff, sample_rate × 0.49)` so `g` stays finite.
/// - `resonance`: Q, default 1/√2 (Butterworth). Not clamped: the 48 dB
///   cascade needs Q values down to 0.5098.
/// - `mode`: lowpass or highpass, default lowpass.
///
/// # Example
///
/// ```rust
/// use ember_core::{FilterStage, StageMode};
///
/// let mut stage = FilterStage::new(48000.0);
/// stage.set_mode(StageMode::Highpass);
/// stage.set_cutoff(200.0);
/// stage.set_resonance(0.7071);
/// let y = stage.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct FilterStage {
    ic1eq: f64,
    ic2eq: f64,

    g: f64,
    k: f64,

    sample_rate: f64,
    cutoff: f64,
    resonance: f64,
    mode: StageMode,
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl FilterStage {
    /// Create a stage at the given sample rate: 1 kHz, Q = 1/√2, lowpass.
    pub fn new(sample_rate: f64) -> Self {
        let mut stage = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: core::f64::consts::FRAC_1_SQRT_2,
            mode: StageMode::Lowpass,
        };
        stage.update_coefficients();
        stage
    }

    /// Set cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, freq: f64) {
        self.cutoff = freq;
        self.update_coefficients();
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Set resonance (Q).
    pub fn set_resonance(&mut self, q: f64) {
        self.resonance = q;
        self.update_coefficients();
    }

    /// Current resonance (Q).
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    /// Select lowpass or highpass output.
    pub fn set_mode(&mut self, mode: StageMode) {
        self.mode = mode;
    }

    /// Current output mode.
    pub fn mode(&self) -> StageMode {
        self.mode
    }

    /// Update the sample rate and recompute `g`.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    /// Integrator states `(ic1eq, ic2eq)`.
    pub fn state(&self) -> (f64, f64) {
        (self.ic1eq, self.ic2eq)
    }

    /// Clear both integrators.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn update_coefficients(&mut self) {
        let fc = self.cutoff.min(self.sample_rate * 0.49);
        self.g = tan(PI * fc / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return `(lowpass, highpass)`.
    #[inline]
    pub fn process_both(&mut self, input: f64) -> (f64, f64) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        (v2, input - self.k * v1 - v2)
    }

    /// Process one sample through the selected output.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let (lp, hp) = self.process_both(input);
        match self.mode {
            StageMode::Lowpass => lp,
            StageMode::Highpass => hp,
        }
    }
}
