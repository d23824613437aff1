//! Cascaded lowpass/highpass filter with selectable slope.
//!
//! [`HighPrecisionFilter`] provides 6, 12, 24 and 48 dB/oct lowpass or
//! highpass responses for the pre- and post-saturation cut controls:
//!
//! | slope | path | Q per stage |
//! |-------|------|-------------|
//! | 6 dB  | [`OnePoleFilter`] | n/a |
//! | 12 dB | 1 × [`FilterStage`] | 0.7071 |
//! | 24 dB | 2 × [`FilterStage`] | 0.5412, 1.3066 |
//! | 48 dB | 4 × [`FilterStage`] | 0.5098, 0.6013, 0.8999, 2.5629 |
//!
//! The Q tables are the factorised pole pairs of 4th and 8th order
//! Butterworth prototypes, so the cascade is maximally flat.
//!
//! # Bypass
//!
//! A lowpass at or above 19950 Hz, or a highpass at or below 20.5 Hz, is
//! treated as "off": the input passes through bit-exact and every section
//! keeps its state untouched until the filter is moved back into range.
//!
//! # Parameter caching
//!
//! The channel processor calls [`set_params`](HighPrecisionFilter::set_params)
//! every few samples with smoothed values. Calls that match the cached type,
//! slope and sample rate with a frequency change below 0.01 Hz return
//! immediately.

use crate::{FilterStage, OnePoleFilter, StageMode};

/// Maximum number of cascaded 2-pole sections.
pub const MAX_STAGES: usize = 4;

/// Lowpass at or above this frequency bypasses the filter.
pub const LOWPASS_BYPASS_HZ: f64 = 19950.0;

/// Highpass at or below this frequency bypasses the filter.
pub const HIGHPASS_BYPASS_HZ: f64 = 20.5;

/// Frequency change below which `set_params` is a no-op.
const FREQ_TOLERANCE: f64 = 0.01;

/// Filter response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Removes content above the cutoff.
    #[default]
    LowPass,
    /// Removes content below the cutoff.
    HighPass,
}

/// Roll-off steepness in dB per octave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterSlope {
    /// 6 dB/oct, one-pole.
    Slope6dB,
    /// 12 dB/oct, one TPT section.
    #[default]
    Slope12dB,
    /// 24 dB/oct, two TPT sections.
    Slope24dB,
    /// 48 dB/oct, four TPT sections.
    Slope48dB,
}

impl FilterSlope {
    /// All slopes, shallowest first.
    pub const ALL: [FilterSlope; 4] = [
        FilterSlope::Slope6dB,
        FilterSlope::Slope12dB,
        FilterSlope::Slope24dB,
        FilterSlope::Slope48dB,
    ];

    /// Slope in dB/oct.
    pub fn db(self) -> u32 {
        match self {
            FilterSlope::Slope6dB => 6,
            FilterSlope::Slope12dB => 12,
            FilterSlope::Slope24dB => 24,
            FilterSlope::Slope48dB => 48,
        }
    }

    /// Parse a dB/oct value. Only 6, 12, 24 and 48 are accepted.
    pub fn from_db(db: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.db() == db)
    }

    /// Q values of the 2-pole sections, or an empty slice for the one-pole path.
    pub fn stage_q(self) -> &'static [f64] {
        match self {
            FilterSlope::Slope6dB => &[],
            FilterSlope::Slope12dB => &[0.7071],
            FilterSlope::Slope24dB => &[0.5412, 1.3066],
            FilterSlope::Slope48dB => &[0.5098, 0.6013, 0.8999, 2.5629],
        }
    }
}

/// The cached `(type, frequency, slope)` triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    /// Response.
    pub filter_type: FilterType,
    /// Cutoff in Hz.
    pub frequency: f64,
    /// Roll-off.
    pub slope: FilterSlope,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            filter_type: FilterType::LowPass,
            frequency: 1000.0,
            slope: FilterSlope::Slope12dB,
        }
    }
}

/// Lowpass/highpass filter with 6 to 48 dB/oct slopes.
///
/// One instance per channel. `prepare` before processing, `set_params` as
/// often as needed, `process` once per sample.
///
/// # Example
///
/// ```rust
/// use ember_core::{FilterSlope, FilterType, HighPrecisionFilter};
///
/// let mut hp = HighPrecisionFilter::new();
/// hp.prepare(48000.0);
/// hp.set_params(FilterType::HighPass, 80.0, FilterSlope::Slope24dB);
/// assert_eq!(hp.active_stages(), 2);
///
/// let y = hp.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct HighPrecisionFilter {
    stages: [FilterStage; MAX_STAGES],
    one_pole: OnePoleFilter,

    /// Rate handed to `prepare`.
    sample_rate: f64,
    /// Rate the cached parameters were computed for.
    cached_rate: f64,
    params: FilterParams,
    active_stages: usize,
    bypassed: bool,
}

impl Default for HighPrecisionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl HighPrecisionFilter {
    /// Create a filter at 44.1 kHz: 12 dB/oct lowpass at 1 kHz.
    pub fn new() -> Self {
        let sample_rate = 44100.0;
        Self {
            stages: core::array::from_fn(|_| FilterStage::new(sample_rate)),
            one_pole: OnePoleFilter::new(),
            sample_rate,
            cached_rate: sample_rate,
            params: FilterParams::default(),
            active_stages: 1,
            bypassed: false,
        }
    }

    /// Store the sample rate and clear every section.
    ///
    /// Stage coefficients are refreshed by the next `set_params` call, which
    /// sees the rate change and recomputes even if the triple is unchanged.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.one_pole.reset();
        for stage in &mut self.stages {
            stage.set_sample_rate(sample_rate);
            stage.reset();
        }
    }

    /// Clear every section without touching coefficients.
    pub fn reset(&mut self) {
        self.one_pole.reset();
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Configure type, cutoff and slope.
    pub fn set_params(&mut self, filter_type: FilterType, frequency: f64, slope: FilterSlope) {
        if self.params.filter_type == filter_type
            && (self.params.frequency - frequency).abs() < FREQ_TOLERANCE
            && self.params.slope == slope
            && self.cached_rate == self.sample_rate
        {
            return;
        }

        self.params = FilterParams {
            filter_type,
            frequency,
            slope,
        };
        self.cached_rate = self.sample_rate;

        self.bypassed = match filter_type {
            FilterType::LowPass => frequency >= LOWPASS_BYPASS_HZ,
            FilterType::HighPass => frequency <= HIGHPASS_BYPASS_HZ,
        };
        if self.bypassed || slope == FilterSlope::Slope6dB {
            return;
        }

        let mode = match filter_type {
            FilterType::LowPass => StageMode::Lowpass,
            FilterType::HighPass => StageMode::Highpass,
        };
        let qs = slope.stage_q();
        self.active_stages = qs.len();
        for (stage, &q) in self.stages.iter_mut().zip(qs) {
            stage.set_mode(mode);
            stage.set_cutoff(frequency);
            stage.set_resonance(q);
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        if self.bypassed {
            return input;
        }
        if self.params.slope == FilterSlope::Slope6dB {
            let FilterParams {
                filter_type,
                frequency,
                ..
            } = self.params;
            return match filter_type {
                FilterType::LowPass => {
                    self.one_pole
                        .process_lp(input, frequency, self.cached_rate)
                }
                FilterType::HighPass => {
                    self.one_pole
                        .process_hp(input, frequency, self.cached_rate)
                }
            };
        }
        self.stages[..self.active_stages]
            .iter_mut()
            .fold(input, |x, stage| stage.process(x))
    }

    /// Cached parameters from the last effective `set_params` call.
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Sample rate from the last `prepare`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Whether the input currently passes through unchanged.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Whether the 6 dB/oct one-pole path is selected.
    pub fn uses_one_pole(&self) -> bool {
        self.params.slope == FilterSlope::Slope6dB
    }

    /// Number of 2-pole sections in the signal path (0 on the one-pole path).
    pub fn active_stages(&self) -> usize {
        if self.uses_one_pole() {
            0
        } else {
            self.active_stages
        }
    }

    /// Borrow section `index` (0..4).
    pub fn stage(&self, index: usize) -> Option<&FilterStage> {
        self.stages.get(index)
    }

    /// Borrow the one-pole section.
    pub fn one_pole(&self) -> &OnePoleFilter {
        &self.one_pole
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(sample_rate: f64) -> HighPrecisionFilter {
        let mut f = HighPrecisionFilter::new();
        f.prepare(sample_rate);
        f
    }

    #[test]
    fn test_defaults() {
        let f = HighPrecisionFilter::new();
        assert_eq!(f.params(), FilterParams::default());
        assert_eq!(f.sample_rate(), 44100.0);
        assert_eq!(f.active_stages(), 1);
        assert!(!f.is_bypassed());
    }

    #[test]
    fn test_slope_db_roundtrip() {
        for slope in FilterSlope::ALL {
            assert_eq!(FilterSlope::from_db(slope.db()), Some(slope));
        }
        assert_eq!(FilterSlope::from_db(18), None);
    }

    #[test]
    fn test_stage_counts() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 2000.0, FilterSlope::Slope48dB);
        assert_eq!(f.active_stages(), 4);
        f.set_params(FilterType::LowPass, 2000.0, FilterSlope::Slope24dB);
        assert_eq!(f.active_stages(), 2);
        f.set_params(FilterType::LowPass, 2000.0, FilterSlope::Slope12dB);
        assert_eq!(f.active_stages(), 1);
        f.set_params(FilterType::LowPass, 2000.0, FilterSlope::Slope6dB);
        assert_eq!(f.active_stages(), 0);
        assert!(f.uses_one_pole());
    }

    #[test]
    fn test_stage_q_assignment() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::HighPass, 300.0, FilterSlope::Slope48dB);
        let qs: [f64; 4] = core::array::from_fn(|i| f.stage(i).map_or(0.0, FilterStage::resonance));
        assert_eq!(qs, [0.5098, 0.6013, 0.8999, 2.5629]);
        for i in 0..4 {
            let stage = f.stage(i).unwrap();
            assert_eq!(stage.mode(), StageMode::Highpass);
            assert_eq!(stage.cutoff(), 300.0);
        }
    }

    #[test]
    fn test_bypass_thresholds_pass_exactly() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 19950.0, FilterSlope::Slope48dB);
        assert!(f.is_bypassed());
        assert_eq!(f.process(1.0), 1.0);
        assert_eq!(f.process(-0.123456789), -0.123456789);

        f.set_params(FilterType::HighPass, 20.5, FilterSlope::Slope12dB);
        assert!(f.is_bypassed());
        assert_eq!(f.process(1.0), 1.0);

        f.set_params(FilterType::LowPass, 19949.0, FilterSlope::Slope12dB);
        assert!(!f.is_bypassed());
        f.set_params(FilterType::HighPass, 20.6, FilterSlope::Slope12dB);
        assert!(!f.is_bypassed());
    }

    #[test]
    fn test_bypass_freezes_state() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 500.0, FilterSlope::Slope12dB);
        for _ in 0..64 {
            f.process(1.0);
        }
        let before = f.stage(0).unwrap().state();
        assert_ne!(before, (0.0, 0.0));

        f.set_params(FilterType::LowPass, 20000.0, FilterSlope::Slope12dB);
        for _ in 0..64 {
            f.process(-1.0);
        }
        assert_eq!(f.stage(0).unwrap().state(), before);
    }

    #[test]
    fn test_small_frequency_change_is_ignored() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 1000.0, FilterSlope::Slope12dB);
        f.set_params(FilterType::LowPass, 1000.005, FilterSlope::Slope12dB);
        assert_eq!(f.params().frequency, 1000.0);
        f.set_params(FilterType::LowPass, 1000.02, FilterSlope::Slope12dB);
        assert_eq!(f.params().frequency, 1000.02);
    }

    #[test]
    fn test_rate_change_forces_recompute() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 1000.0, FilterSlope::Slope12dB);
        f.prepare(96000.0);
        // Same triple, new rate: must not short-circuit.
        f.set_params(FilterType::LowPass, 1000.0, FilterSlope::Slope6dB);
        f.set_params(FilterType::LowPass, 1000.0, FilterSlope::Slope6dB);
        let expected = 1.0 - libm::exp(-core::f64::consts::TAU * 1000.0 / 96000.0);
        assert!((f.process(1.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_one_pole_path_matches_section() {
        let mut f = prepared(44100.0);
        f.set_params(FilterType::HighPass, 150.0, FilterSlope::Slope6dB);
        let mut reference = OnePoleFilter::new();
        for i in 0..32 {
            let x = libm::sin(i as f64 * 0.37);
            assert_eq!(f.process(x), reference.process_hp(x, 150.0, 44100.0));
        }
    }

    #[test]
    fn test_reset_clears_all_sections() {
        let mut f = prepared(48000.0);
        f.set_params(FilterType::LowPass, 800.0, FilterSlope::Slope48dB);
        for _ in 0..100 {
            f.process(0.5);
        }
        f.reset();
        for i in 0..MAX_STAGES {
            assert_eq!(f.stage(i).unwrap().state(), (0.0, 0.0));
        }
        assert_eq!(f.one_pole().state(), 0.0);
    }
}
