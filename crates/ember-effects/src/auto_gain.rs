//! Loudness learning for automatic gain staging.
//!
//! While learning, the processor feeds every input sample (after input
//! gain) and every mixed output sample (before output gain) into an
//! [`AutoGain`]. After [`LEARNING_SECONDS`] of host audio the window closes
//! and produces an [`AutoGainOutcome`]:
//!
//! - an input trim if the input peak went above [`PEAK_CEILING`], sized so
//!   the peak lands on −0.1 dBFS
//! - an output gain that matches the output RMS to the input RMS
//!
//! Samples at or below [`SILENCE_THRESHOLD`] are left out of the RMS so
//! gaps between phrases do not drag the estimate down.

use ember_core::linear_to_db;
use libm::sqrt;

/// Length of the learning window in seconds of host audio.
pub const LEARNING_SECONDS: f64 = 3.0;

/// Samples with a magnitude at or below this are not measured.
pub const SILENCE_THRESHOLD: f32 = 0.001;

/// Linear input peak above which the input is trimmed (−0.1 dBFS).
pub const PEAK_CEILING: f64 = 0.9885;

const PEAK_TARGET_DB: f64 = -0.1;
const MIN_RMS: f64 = 1e-4;
const MAX_OUTPUT_GAIN_DB: f64 = 18.0;

/// Result of a completed learning window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoGainOutcome {
    /// Largest input magnitude seen.
    pub input_peak: f64,
    /// RMS of the measured input samples.
    pub rms_in: f64,
    /// RMS of the measured output samples.
    pub rms_out: f64,
    /// Change to apply to the input gain, dB. Always negative.
    pub input_trim_db: Option<f64>,
    /// New output gain, dB.
    pub output_gain_db: Option<f64>,
}

/// Accumulator for one learning window.
#[derive(Debug, Clone, Default)]
pub struct AutoGain {
    learning: bool,
    sum_in: f64,
    count_in: u64,
    sum_out: f64,
    count_out: u64,
    peak_in: f64,
    processed: u64,
    target: u64,
}

impl AutoGain {
    /// Create an idle accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the auto-gain switch once per block and return whether this
    /// block is measured.
    ///
    /// Switching on starts a fresh window; switching off abandons it.
    pub fn update(&mut self, enabled: bool, sample_rate: f64) -> bool {
        if enabled && !self.learning {
            self.start(sample_rate);
        } else if !enabled {
            self.learning = false;
        }
        self.learning
    }

    /// Start a fresh window at `sample_rate`.
    pub fn start(&mut self, sample_rate: f64) {
        *self = Self {
            learning: true,
            target: (sample_rate * LEARNING_SECONDS) as u64,
            ..Self::default()
        };
    }

    /// Whether a window is open.
    pub fn is_learning(&self) -> bool {
        self.learning
    }

    /// Fraction of the window completed, 0..1.
    pub fn progress(&self) -> f64 {
        if self.target == 0 {
            return 0.0;
        }
        (self.processed as f64 / self.target as f64).min(1.0)
    }

    /// Measure one input sample, already scaled by the input gain.
    #[inline]
    pub fn accumulate_input(&mut self, sample: f32) {
        let magnitude = sample.abs();
        self.peak_in = self.peak_in.max(f64::from(magnitude));
        if magnitude > SILENCE_THRESHOLD {
            self.sum_in += f64::from(sample) * f64::from(sample);
            self.count_in += 1;
        }
    }

    /// Measure one mixed output sample, before output gain.
    #[inline]
    pub fn accumulate_output(&mut self, sample: f32) {
        if sample.abs() > SILENCE_THRESHOLD {
            self.sum_out += f64::from(sample) * f64::from(sample);
            self.count_out += 1;
        }
    }

    /// Count `frames` host samples and close the window once it is full.
    pub fn finish_block(&mut self, frames: usize) -> Option<AutoGainOutcome> {
        if !self.learning {
            return None;
        }
        self.processed += frames as u64;
        if self.processed < self.target {
            return None;
        }
        self.learning = false;

        let rms_in = rms(self.sum_in, self.count_in);
        let rms_out = rms(self.sum_out, self.count_out);

        let input_trim_db = (self.peak_in > PEAK_CEILING)
            .then(|| PEAK_TARGET_DB - linear_to_db(self.peak_in));
        let output_gain_db = (rms_in > MIN_RMS && rms_out > MIN_RMS).then(|| {
            linear_to_db(rms_in / rms_out).clamp(-MAX_OUTPUT_GAIN_DB, MAX_OUTPUT_GAIN_DB)
        });

        Some(AutoGainOutcome {
            input_peak: self.peak_in,
            rms_in,
            rms_out,
            input_trim_db,
            output_gain_db,
        })
    }

    /// Abandon any open window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn rms(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sqrt(sum / count as f64) }
}
