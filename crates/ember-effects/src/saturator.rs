//! Stereo saturator processor.
//!
//! Each channel runs the same chain at the oversampled working rate:
//!
//! ```text
//! x · input_gain → pre HP → pre LP → SaturationCore → post HP → post LP
//! ```
//!
//! The dry signal is delayed by the oversampler latency so the dry/wet mix
//! stays phase-aligned. Wet-path controls are smoothed at the working rate,
//! mix and output gain at the host rate. Filter cutoffs are pushed into the
//! filters every [`FILTER_UPDATE_INTERVAL`] working samples.

use ember_core::param::DEFAULT_TRANSITION_MS;
use ember_core::{
    FilterSlope, FilterType, HighPrecisionFilter, InterpolatedDelay, LinearSmoothedParam,
    MAX_OVERSAMPLE_FACTOR, OversampleQuality, Oversampler, SaturationCore, db_to_linear,
    wet_dry_mix,
};

use crate::auto_gain::{AutoGain, AutoGainOutcome};
use crate::params::{SaturatorParams, ranges};

/// Longest dry-path delay in host samples.
pub const MAX_DRY_DELAY: usize = 16384;

/// Working samples between filter coefficient updates.
pub const FILTER_UPDATE_INTERVAL: usize = 8;

const PRE_FILTER_SLOPE: FilterSlope = FilterSlope::Slope12dB;
const METER_DECAY: f32 = 0.9;
const RATE_TOLERANCE_HZ: f64 = 1.0;

/// Block peak meter with per-block decay.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakMeter {
    level: f32,
}

impl PeakMeter {
    /// Fold in the peak of one block.
    pub fn update(&mut self, block_peak: f32) {
        self.level = (self.level * METER_DECAY).max(block_peak);
    }

    /// Current level, linear.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
struct Cutoffs {
    pre_low: f64,
    pre_high: f64,
    post_low: f64,
    post_high: f64,
}

/// One channel's filters, core, oversampler and dry delay.
#[derive(Debug, Clone)]
struct Channel {
    pre_low: HighPrecisionFilter,
    pre_high: HighPrecisionFilter,
    core: SaturationCore,
    post_low: HighPrecisionFilter,
    post_high: HighPrecisionFilter,
    oversampler: Oversampler,
    dry_delay: InterpolatedDelay,
}

impl Channel {
    fn new(quality: OversampleQuality) -> Self {
        Self {
            pre_low: HighPrecisionFilter::new(),
            pre_high: HighPrecisionFilter::new(),
            core: SaturationCore::new(),
            post_low: HighPrecisionFilter::new(),
            post_high: HighPrecisionFilter::new(),
            oversampler: Oversampler::new(quality),
            dry_delay: InterpolatedDelay::new(MAX_DRY_DELAY),
        }
    }

    fn prepare(&mut self, working_rate: f64) {
        for filter in self.filters_mut() {
            filter.prepare(working_rate);
        }
        self.core.prepare(working_rate);
        self.core.reset();
    }

    fn reset(&mut self) {
        for filter in self.filters_mut() {
            filter.reset();
        }
        self.core.reset();
        self.oversampler.reset();
        self.dry_delay.clear();
    }

    fn filters_mut(&mut self) -> [&mut HighPrecisionFilter; 4] {
        [
            &mut self.pre_low,
            &mut self.pre_high,
            &mut self.post_low,
            &mut self.post_high,
        ]
    }

    fn set_cutoffs(&mut self, cutoffs: Cutoffs, post_slope: FilterSlope) {
        self.pre_low
            .set_params(FilterType::HighPass, cutoffs.pre_low, PRE_FILTER_SLOPE);
        self.pre_high
            .set_params(FilterType::LowPass, cutoffs.pre_high, PRE_FILTER_SLOPE);
        self.post_low
            .set_params(FilterType::HighPass, cutoffs.post_low, post_slope);
        self.post_high
            .set_params(FilterType::LowPass, cutoffs.post_high, post_slope);
    }

    #[inline]
    fn process_wet(
        &mut self,
        x: f64,
        params: &SaturatorParams,
        drive_db: f64,
        character: f64,
    ) -> f64 {
        let x = self.pre_high.process(self.pre_low.process(x));
        let x = self.core.process(x, params.algorithm, drive_db, character);
        self.post_high.process(self.post_low.process(x))
    }
}

/// Stereo saturation processor.
///
/// Parameters set with [`set_params`](Self::set_params) take effect at the
/// start of the next block and ramp over 50 ms. Call
/// [`prepare`](Self::prepare) when the host sample rate changes.
///
/// # Example
///
/// ```rust
/// use ember_core::{Algorithm, OversampleQuality};
/// use ember_effects::{Saturator, SaturatorParams};
///
/// let mut sat = Saturator::new(44100.0);
/// sat.set_params(SaturatorParams {
///     algorithm: Algorithm::Console,
///     drive_db: 6.0,
///     quality: OversampleQuality::X4,
///     ..SaturatorParams::default()
/// });
/// assert_eq!(sat.latency_samples(), 4);
///
/// let mut left = [0.5f32; 64];
/// let mut right = [0.5f32; 64];
/// sat.process_block(&mut left, &mut right);
/// ```
#[derive(Debug, Clone)]
pub struct Saturator {
    sample_rate: f64,
    working_rate: f64,
    params: SaturatorParams,
    channels: [Channel; 2],

    // Working rate
    input_gain: LinearSmoothedParam,
    drive: LinearSmoothedParam,
    character: LinearSmoothedParam,
    pre_low_cut: LinearSmoothedParam,
    pre_high_cut: LinearSmoothedParam,
    post_low_cut: LinearSmoothedParam,
    post_high_cut: LinearSmoothedParam,

    // Host rate
    mix: LinearSmoothedParam,
    output_gain: LinearSmoothedParam,

    auto_gain: AutoGain,
    input_meter: PeakMeter,
    output_meter: PeakMeter,
}

impl Saturator {
    /// Create a processor with default parameters at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let params = SaturatorParams::default();
        let smoothed =
            |value| LinearSmoothedParam::with_config(value, sample_rate, DEFAULT_TRANSITION_MS);
        let mut sat = Self {
            sample_rate,
            working_rate: 0.0,
            params,
            channels: [Channel::new(params.quality), Channel::new(params.quality)],
            input_gain: smoothed(db_to_linear(params.input_gain_db)),
            drive: smoothed(params.drive_db),
            character: smoothed(params.character),
            pre_low_cut: smoothed(params.pre_low_cut_hz),
            pre_high_cut: smoothed(params.pre_high_cut_hz),
            post_low_cut: smoothed(params.post_low_cut_hz),
            post_high_cut: smoothed(params.post_high_cut_hz),
            mix: smoothed(params.mix_percent * 0.01),
            output_gain: smoothed(db_to_linear(params.output_gain_db)),
            auto_gain: AutoGain::new(),
            input_meter: PeakMeter::default(),
            output_meter: PeakMeter::default(),
        };
        sat.prepare(sample_rate);
        sat
    }

    /// Set the host sample rate and clear all state.
    ///
    /// Smoothed controls jump to their current parameter values and any
    /// auto-gain window is abandoned.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.update_quality();
        self.update_targets();
        self.mix.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);

        self.working_rate = 0.0;
        self.update_working_rate();
        for channel in &mut self.channels {
            channel.reset();
        }
        self.auto_gain.reset();
        self.input_meter.reset();
        self.output_meter.reset();
    }

    /// Clear filter, saturation, oversampler and delay state without
    /// changing the sample rate. Smoothed controls jump to the current
    /// parameters.
    pub fn reset(&mut self) {
        self.update_targets();
        for channel in &mut self.channels {
            channel.reset();
        }
        for param in self.smoothers_mut() {
            param.snap_to_target();
        }
        self.input_meter.reset();
        self.output_meter.reset();
    }

    /// Replace the parameter set. Values are clamped into range.
    pub fn set_params(&mut self, params: SaturatorParams) {
        self.params = params.clamped();
    }

    /// Current parameters, including any auto-gain adjustments.
    pub fn params(&self) -> &SaturatorParams {
        &self.params
    }

    /// Host sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Rate the filters and cores run at.
    pub fn working_rate(&self) -> f64 {
        self.working_rate
    }

    /// Oversampler latency in host samples.
    pub fn latency(&self) -> f64 {
        self.params.quality.latency()
    }

    /// Latency rounded to whole host samples, for hosts that need an integer.
    pub fn latency_samples(&self) -> usize {
        libm::round(self.latency()) as usize
    }

    /// Input peak meter, linear.
    pub fn input_level(&self) -> f32 {
        self.input_meter.level()
    }

    /// Output peak meter, linear.
    pub fn output_level(&self) -> f32 {
        self.output_meter.level()
    }

    /// Whether an auto-gain window is open.
    pub fn is_learning(&self) -> bool {
        self.auto_gain.is_learning()
    }

    /// Fraction of the open auto-gain window completed.
    pub fn learning_progress(&self) -> f64 {
        self.auto_gain.progress()
    }

    /// Process one stereo block in place.
    ///
    /// Only the first `min(left.len(), right.len())` frames are processed.
    /// Returns the auto-gain outcome on the block that closes a learning
    /// window; the outcome has already been applied to [`params`](Self::params).
    pub fn process_block(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
    ) -> Option<AutoGainOutcome> {
        let frames = left.len().min(right.len());
        let (left, right) = (&mut left[..frames], &mut right[..frames]);
        self.update_targets();

        if self.params.bypass {
            let gain = self.input_gain.target() as f32;
            for s in left.iter_mut().chain(right.iter_mut()) {
                *s *= gain;
            }
            let peak = block_peak(left, right);
            self.input_meter.update(peak);
            self.output_meter.update(peak);
            return None;
        }

        self.update_quality();
        let learning = self.auto_gain.update(self.params.auto_gain, self.sample_rate);
        self.update_working_rate();

        let params = self.params;
        let factor = self.channels[0].oversampler.factor();
        let latency = self.channels[0].oversampler.latency() as f32;
        // Measurement uses the block-start values for every sample
        let learn_input_gain = self.input_gain.get() as f32;
        let learn_mix = self.mix.get() as f32;

        let mut work = [[0.0f64; MAX_OVERSAMPLE_FACTOR]; 2];
        let mut update_counter = 0usize;
        let mut input_peak = 0.0f32;
        let mut output_peak = 0.0f32;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = [*l, *r];
            let mut dry = [0.0f32; 2];
            for ((channel, w), (&x, d)) in self
                .channels
                .iter_mut()
                .zip(work.iter_mut())
                .zip(input.iter().zip(dry.iter_mut()))
            {
                if learning {
                    self.auto_gain.accumulate_input(x * learn_input_gain);
                }
                *d = channel.dry_delay.process(x, latency);
                channel.oversampler.upsample_into(f64::from(x), w);
            }

            for k in 0..factor {
                let input_gain = self.input_gain.advance();
                let drive_db = self.drive.advance();
                let character = self.character.advance();
                let cutoffs = Cutoffs {
                    pre_low: self.pre_low_cut.advance(),
                    pre_high: self.pre_high_cut.advance(),
                    post_low: self.post_low_cut.advance(),
                    post_high: self.post_high_cut.advance(),
                };
                if update_counter == 0 {
                    for channel in &mut self.channels {
                        channel.set_cutoffs(cutoffs, params.post_slope);
                    }
                }
                update_counter = (update_counter + 1) % FILTER_UPDATE_INTERVAL;

                for (channel, w) in self.channels.iter_mut().zip(work.iter_mut()) {
                    w[k] = channel.process_wet(w[k] * input_gain, &params, drive_db, character);
                }
            }

            let mix = self.mix.advance() as f32;
            let output_gain = self.output_gain.advance() as f32;
            let mut out = [0.0f32; 2];
            for ch in 0..2 {
                let wet = self.channels[ch].oversampler.downsample_from(&work[ch][..factor]) as f32;
                if learning {
                    self.auto_gain
                        .accumulate_output(wet_dry_mix(dry[ch], wet, learn_mix));
                }
                let mut y = wet_dry_mix(dry[ch], wet, mix) * output_gain;
                if params.safety_clip {
                    y = y.clamp(-1.0, 1.0);
                }
                out[ch] = y;
                input_peak = input_peak.max(dry[ch].abs());
                output_peak = output_peak.max(y.abs());
            }
            *l = out[0];
            *r = out[1];
        }

        self.input_meter.update(input_peak);
        self.output_meter.update(output_peak);

        let outcome = self.auto_gain.finish_block(frames)?;
        self.apply_auto_gain(&outcome);
        Some(outcome)
    }

    fn apply_auto_gain(&mut self, outcome: &AutoGainOutcome) {
        if let Some(trim) = outcome.input_trim_db {
            self.params.input_gain_db = (self.params.input_gain_db + trim)
                .clamp(*ranges::GAIN_DB.start(), *ranges::GAIN_DB.end());
        }
        if let Some(gain) = outcome.output_gain_db {
            self.params.output_gain_db = gain;
        }
        self.params.auto_gain = false;
    }

    fn update_targets(&mut self) {
        let p = self.params;
        self.input_gain.set_target(db_to_linear(p.input_gain_db));
        self.drive.set_target(p.drive_db);
        self.character.set_target(p.character);
        self.pre_low_cut.set_target(p.pre_low_cut_hz);
        self.pre_high_cut.set_target(p.pre_high_cut_hz);
        self.post_low_cut.set_target(p.post_low_cut_hz);
        self.post_high_cut.set_target(p.post_high_cut_hz);
        self.mix.set_target(p.mix_percent * 0.01);
        self.output_gain.set_target(db_to_linear(p.output_gain_db));
    }

    fn update_quality(&mut self) {
        if self.channels[0].oversampler.quality() == self.params.quality {
            return;
        }
        for channel in &mut self.channels {
            channel.oversampler = Oversampler::new(self.params.quality);
        }
    }

    fn update_working_rate(&mut self) {
        let rate = self.sample_rate * self.channels[0].oversampler.factor() as f64;
        if (rate - self.working_rate).abs() <= RATE_TOLERANCE_HZ {
            return;
        }
        self.working_rate = rate;
        for channel in &mut self.channels {
            channel.prepare(rate);
        }
        for param in self.wet_smoothers_mut() {
            param.set_sample_rate(rate);
        }
    }

    fn wet_smoothers_mut(&mut self) -> [&mut LinearSmoothedParam; 7] {
        [
            &mut self.input_gain,
            &mut self.drive,
            &mut self.character,
            &mut self.pre_low_cut,
            &mut self.pre_high_cut,
            &mut self.post_low_cut,
            &mut self.post_high_cut,
        ]
    }

    fn smoothers_mut(&mut self) -> [&mut LinearSmoothedParam; 9] {
        [
            &mut self.input_gain,
            &mut self.drive,
            &mut self.character,
            &mut self.pre_low_cut,
            &mut self.pre_high_cut,
            &mut self.post_low_cut,
            &mut self.post_high_cut,
            &mut self.mix,
            &mut self.output_gain,
        ]
    }
}

fn block_peak(left: &[f32], right: &[f32]) -> f32 {
    left.iter().chain(right).fold(0.0f32, |peak, s| peak.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Algorithm;

    fn sine(freq: f32, amplitude: f32, rate: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|n| amplitude * libm::sinf(2.0 * core::f32::consts::PI * freq * n as f32 / rate))
            .collect()
    }

    #[test]
    fn test_latency_follows_quality() {
        let mut sat = Saturator::new(48000.0);
        assert!((sat.latency() - 3.75).abs() < 1e-12);
        assert_eq!(sat.latency_samples(), 4);

        for (quality, expected) in [
            (OversampleQuality::Off, 0.0),
            (OversampleQuality::X4, 3.875),
            (OversampleQuality::X16, 127.0 / 32.0),
        ] {
            sat.set_params(SaturatorParams { quality, ..SaturatorParams::default() });
            assert!((sat.latency() - expected).abs() < 1e-12, "{quality:?}");
        }
    }

    #[test]
    fn test_working_rate_tracks_quality() {
        let mut sat = Saturator::new(44100.0);
        assert_eq!(sat.working_rate(), 88200.0);

        sat.set_params(SaturatorParams {
            quality: OversampleQuality::X8,
            ..SaturatorParams::default()
        });
        let mut l = [0.0f32; 16];
        let mut r = [0.0f32; 16];
        sat.process_block(&mut l, &mut r);
        assert_eq!(sat.working_rate(), 352800.0);
    }

    #[test]
    fn test_bypass_applies_input_gain_only() {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(SaturatorParams {
            bypass: true,
            input_gain_db: -6.0,
            algorithm: Algorithm::HardClip,
            drive_db: 24.0,
            ..SaturatorParams::default()
        });
        let mut l = [0.8f32; 32];
        let mut r = [-0.4f32; 32];
        sat.process_block(&mut l, &mut r);

        let g = db_to_linear(-6.0) as f32;
        assert!(l.iter().all(|&s| (s - 0.8 * g).abs() < 1e-6));
        assert!(r.iter().all(|&s| (s + 0.4 * g).abs() < 1e-6));
        assert!((sat.input_level() - 0.8 * g).abs() < 1e-6);
        assert_eq!(sat.input_level(), sat.output_level());
    }

    #[test]
    fn test_full_dry_is_delayed_input() {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(SaturatorParams {
            mix_percent: 0.0,
            quality: OversampleQuality::Off,
            drive_db: 18.0,
            ..SaturatorParams::default()
        });
        sat.reset();
        let input = sine(440.0, 0.5, 48000.0, 256);
        let mut l = input.clone();
        let mut r = input.clone();
        sat.process_block(&mut l, &mut r);
        for (y, x) in l.iter().zip(&input) {
            assert!((y - x).abs() < 1e-6);
        }
        assert_eq!(l, r);
    }

    #[test]
    fn test_safety_clip() {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(SaturatorParams {
            mix_percent: 0.0,
            output_gain_db: 18.0,
            quality: OversampleQuality::Off,
            ..SaturatorParams::default()
        });
        sat.reset();
        let mut l = vec![0.9f32; 512];
        let mut r = vec![-0.9f32; 512];
        sat.process_block(&mut l, &mut r);
        assert!(l.iter().all(|&s| s <= 1.0));
        assert!(r.iter().all(|&s| s >= -1.0));
        assert_eq!(l[511], 1.0);

        sat.set_params(SaturatorParams {
            safety_clip: false,
            ..*sat.params()
        });
        sat.process_block(&mut l, &mut r);
        assert!(l[511] > 1.0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(SaturatorParams {
            drive_db: 12.0,
            ..SaturatorParams::default()
        });
        let mut l = sine(220.0, 0.7, 48000.0, 1024);
        let mut r = vec![0.0f32; 1024];
        sat.process_block(&mut l, &mut r);
        assert!(l.iter().any(|s| s.abs() > 0.1));
        assert!(r.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_uneven_slices_process_common_frames() {
        let mut sat = Saturator::new(48000.0);
        let mut l = [0.5f32; 8];
        let mut r = [0.5f32; 4];
        sat.process_block(&mut l, &mut r);
        assert_eq!(l[4..], [0.5f32; 4]);
    }

    #[test]
    fn test_meters_decay() {
        let mut meter = PeakMeter::default();
        meter.update(1.0);
        meter.update(0.0);
        assert!((meter.level() - 0.9).abs() < 1e-6);
        meter.update(0.95);
        assert_eq!(meter.level(), 0.95);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut sat = Saturator::new(48000.0);
        sat.set_params(SaturatorParams {
            algorithm: Algorithm::Tape,
            drive_db: 12.0,
            ..SaturatorParams::default()
        });
        let mut l = sine(100.0, 0.9, 48000.0, 2048);
        let mut r = l.clone();
        sat.process_block(&mut l, &mut r);
        sat.reset();
        assert_eq!(sat.input_level(), 0.0);

        let mut zl = [0.0f32; 64];
        let mut zr = [0.0f32; 64];
        sat.process_block(&mut zl, &mut zr);
        assert!(zl.iter().chain(&zr).all(|s| s.abs() < 1e-6));
    }
}
