//! Saturator control set.

use ember_core::{Algorithm, FilterSlope, OversampleQuality};

/// Valid ranges for the continuous controls.
pub mod ranges {
    use core::ops::RangeInclusive;

    /// Input and output gain in dB.
    pub const GAIN_DB: RangeInclusive<f64> = -18.0..=18.0;
    /// Drive in dB.
    pub const DRIVE_DB: RangeInclusive<f64> = 0.0..=24.0;
    /// Algorithm-specific character amount.
    pub const CHARACTER: RangeInclusive<f64> = 0.0..=1.0;
    /// Every pre and post cutoff in Hz.
    pub const CUTOFF_HZ: RangeInclusive<f64> = 20.0..=20000.0;
    /// Dry/wet mix in percent.
    pub const MIX_PERCENT: RangeInclusive<f64> = 0.0..=100.0;
}

/// All controls of a [`Saturator`](crate::Saturator).
///
/// Cutoffs at the edges of [`ranges::CUTOFF_HZ`] leave the matching filter
/// bypassed, so the defaults are a transparent path into the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturatorParams {
    /// Gain into the wet path and the auto-gain input measurement, dB.
    pub input_gain_db: f64,
    /// Starts a learning window on the next block; cleared when it completes.
    pub auto_gain: bool,
    /// Skip all processing except input gain.
    pub bypass: bool,
    /// Pre-saturation highpass cutoff.
    pub pre_low_cut_hz: f64,
    /// Pre-saturation lowpass cutoff.
    pub pre_high_cut_hz: f64,
    /// Saturation transfer characteristic.
    pub algorithm: Algorithm,
    /// Gain into the shaper, dB.
    pub drive_db: f64,
    /// Algorithm-specific shape amount, 0..1.
    pub character: f64,
    /// Oversampling factor of the wet path.
    pub quality: OversampleQuality,
    /// Post-saturation highpass cutoff.
    pub post_low_cut_hz: f64,
    /// Post-saturation lowpass cutoff.
    pub post_high_cut_hz: f64,
    /// Slope of both post filters.
    pub post_slope: FilterSlope,
    /// Wet share of the output, percent.
    pub mix_percent: f64,
    /// Gain after the dry/wet mix, dB.
    pub output_gain_db: f64,
    /// Hard-limit the final output to ±1.
    pub safety_clip: bool,
}

impl Default for SaturatorParams {
    fn default() -> Self {
        Self {
            input_gain_db: 0.0,
            auto_gain: false,
            bypass: false,
            pre_low_cut_hz: 20.0,
            pre_high_cut_hz: 20000.0,
            algorithm: Algorithm::default(),
            drive_db: 0.0,
            character: 0.5,
            quality: OversampleQuality::default(),
            post_low_cut_hz: 20.0,
            post_high_cut_hz: 20000.0,
            post_slope: FilterSlope::default(),
            mix_percent: 100.0,
            output_gain_db: 0.0,
            safety_clip: true,
        }
    }
}

impl SaturatorParams {
    /// Copy with every continuous value clamped into its range.
    ///
    /// NaN falls back to the default value.
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        Self {
            input_gain_db: clamp(self.input_gain_db, &ranges::GAIN_DB, d.input_gain_db),
            pre_low_cut_hz: clamp(self.pre_low_cut_hz, &ranges::CUTOFF_HZ, d.pre_low_cut_hz),
            pre_high_cut_hz: clamp(self.pre_high_cut_hz, &ranges::CUTOFF_HZ, d.pre_high_cut_hz),
            drive_db: clamp(self.drive_db, &ranges::DRIVE_DB, d.drive_db),
            character: clamp(self.character, &ranges::CHARACTER, d.character),
            post_low_cut_hz: clamp(self.post_low_cut_hz, &ranges::CUTOFF_HZ, d.post_low_cut_hz),
            post_high_cut_hz: clamp(self.post_high_cut_hz, &ranges::CUTOFF_HZ, d.post_high_cut_hz),
            mix_percent: clamp(self.mix_percent, &ranges::MIX_PERCENT, d.mix_percent),
            output_gain_db: clamp(self.output_gain_db, &ranges::GAIN_DB, d.output_gain_db),
            ..*self
        }
    }
}

fn clamp(value: f64, range: &core::ops::RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(*range.start(), *range.end())
    }
}
