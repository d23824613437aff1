//! Runtime-selectable oversampling for the saturation path.
//!
//! The saturation core generates harmonics far above Nyquist. ADAA removes
//! most of the aliasing at low drive; oversampling handles the rest:
//!
//! 1. **Upsampling**: linear interpolation between the previous and current
//!    host sample fills `N` working-rate samples.
//! 2. **Processing**: the caller runs filters and the core over those samples.
//! 3. **Downsampling**: a Kaiser-windowed sinc lowpass at `0.45 / N` of the
//!    working rate, evaluated only at the last sub-sample (decimation).
//!
//! Unlike a compile-time factor, [`Oversampler`] switches between 1×, 2×, 4×,
//! 8× and 16× at runtime, so a quality control can be exposed to the user.
//! Coefficients are computed once in [`Oversampler::new`]; all storage is
//! fixed-size.
//!
//! # Latency
//!
//! The linear interpolator delays the working-rate stream by `1 − 1/N` host
//! samples and taking the last sub-sample advances it by the same amount, so
//! the total is the FIR group delay alone: `(taps − 1) / 2 / N` host samples.
//!
//! # Reference
//!
//! Kaiser, "Nonrecursive digital filter design using the I0-sinh window
//! function", Proc. IEEE ISCAS (1974).

use core::f64::consts::PI;
use libm::{sin, sqrt};

/// Highest supported factor.
pub const MAX_OVERSAMPLE_FACTOR: usize = 16;

/// FIR taps per unit of oversampling factor.
const TAPS_PER_FACTOR: usize = 8;

/// Longest FIR, used at 16×.
pub const MAX_TAPS: usize = TAPS_PER_FACTOR * MAX_OVERSAMPLE_FACTOR;

/// Anti-aliasing cutoff, `CUTOFF / N` cycles per working-rate sample
/// (0.9 × host Nyquist).
const CUTOFF: f64 = 0.45;

/// Kaiser window shape. About 60 dB sidelobe rejection.
const KAISER_BETA: f64 = 6.0;

/// Oversampling quality setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OversampleQuality {
    /// Run at the host rate.
    Off,
    /// 2× oversampling.
    #[default]
    X2,
    /// 4× oversampling.
    X4,
    /// 8× oversampling.
    X8,
    /// 16× oversampling.
    X16,
}

impl OversampleQuality {
    /// All settings, lowest first.
    pub const ALL: [OversampleQuality; 5] = [
        OversampleQuality::Off,
        OversampleQuality::X2,
        OversampleQuality::X4,
        OversampleQuality::X8,
        OversampleQuality::X16,
    ];

    /// Oversampling factor (1 for `Off`).
    pub fn factor(self) -> usize {
        match self {
            OversampleQuality::Off => 1,
            OversampleQuality::X2 => 2,
            OversampleQuality::X4 => 4,
            OversampleQuality::X8 => 8,
            OversampleQuality::X16 => 16,
        }
    }

    /// FIR length at this setting.
    pub fn taps(self) -> usize {
        match self.factor() {
            1 => 1,
            factor => TAPS_PER_FACTOR * factor,
        }
    }

    /// FIR group delay in host samples. Zero for `Off`.
    pub fn latency(self) -> f64 {
        (self.taps() - 1) as f64 * 0.5 / self.factor() as f64
    }

    /// Setting for a factor; only 1, 2, 4, 8 and 16 are valid.
    pub fn from_factor(factor: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.factor() == factor)
    }
}

/// Zeroth-order modified Bessel function of the first kind, by power series.
fn bessel_i0(x: f64) -> f64 {
    let half = x * 0.5;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..64 {
        let r = half / k as f64;
        term *= r * r;
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    sum
}

/// Kaiser-windowed sinc lowpass with unity DC gain.
fn design_lowpass(taps: usize, cutoff: f64) -> [f64; MAX_TAPS] {
    let mut coeffs = [0.0; MAX_TAPS];
    let center = (taps - 1) as f64 * 0.5;
    let norm = bessel_i0(KAISER_BETA);

    for (n, c) in coeffs.iter_mut().enumerate().take(taps) {
        let t = n as f64 - center;
        let arg = 2.0 * PI * cutoff * t;
        let sinc = if t == 0.0 { 2.0 * cutoff } else { sin(arg) / (PI * t) };
        let r = t / center;
        let window = bessel_i0(KAISER_BETA * sqrt((1.0 - r * r).max(0.0))) / norm;
        *c = sinc * window;
    }

    let sum: f64 = coeffs[..taps].iter().sum();
    for c in &mut coeffs[..taps] {
        *c /= sum;
    }
    coeffs
}

/// Upsampler/decimator pair for one channel.
///
/// # Example
///
/// ```rust
/// use ember_core::{OversampleQuality, Oversampler, MAX_OVERSAMPLE_FACTOR};
///
/// let mut os = Oversampler::new(OversampleQuality::X4);
/// let mut work = [0.0; MAX_OVERSAMPLE_FACTOR];
/// let n = os.factor();
///
/// os.upsample_into(0.5, &mut work);
/// for s in &mut work[..n] {
///     *s = libm::tanh(*s);
/// }
/// let y = os.downsample_from(&work[..n]);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Oversampler {
    quality: OversampleQuality,
    factor: usize,
    taps: usize,
    coeffs: [f64; MAX_TAPS],
    /// Circular FIR history, newest at `pos`.
    history: [f64; MAX_TAPS],
    pos: usize,
    prev_input: f64,
}

impl Default for Oversampler {
    fn default() -> Self {
        Self::new(OversampleQuality::default())
    }
}

impl Oversampler {
    /// Build an oversampler and design its FIR.
    pub fn new(quality: OversampleQuality) -> Self {
        let factor = quality.factor();
        let taps = quality.taps();
        let coeffs = if factor == 1 {
            let mut c = [0.0; MAX_TAPS];
            c[0] = 1.0;
            c
        } else {
            design_lowpass(taps, CUTOFF / factor as f64)
        };
        Self {
            quality,
            factor,
            taps,
            coeffs,
            history: [0.0; MAX_TAPS],
            pos: 0,
            prev_input: 0.0,
        }
    }

    /// Quality this instance was built for.
    pub fn quality(&self) -> OversampleQuality {
        self.quality
    }

    /// Oversampling factor.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// FIR length.
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// FIR coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs[..self.taps]
    }

    /// Group delay in host samples. Zero at 1×.
    pub fn latency(&self) -> f64 {
        self.quality.latency()
    }

    /// Fill `work[..factor]` with linearly interpolated samples ending at `input`.
    #[inline]
    pub fn upsample_into(&mut self, input: f64, work: &mut [f64; MAX_OVERSAMPLE_FACTOR]) {
        if self.factor == 1 {
            work[0] = input;
            return;
        }
        let step = 1.0 / self.factor as f64;
        let prev = self.prev_input;
        for (i, w) in work.iter_mut().take(self.factor).enumerate() {
            let t = (i as f64 + 1.0) * step;
            *w = prev + t * (input - prev);
        }
        self.prev_input = input;
    }

    /// Push `factor` processed samples through the FIR and return one host sample.
    #[inline]
    pub fn downsample_from(&mut self, work: &[f64]) -> f64 {
        if self.factor == 1 {
            return work.first().copied().unwrap_or(0.0);
        }
        for &s in work.iter().take(self.factor) {
            self.pos = if self.pos == 0 { self.taps - 1 } else { self.pos - 1 };
            self.history[self.pos] = s;
        }

        // history[pos] is the newest sample; coefficient k pairs with the
        // sample k steps back.
        let (wrapped, recent) = self.history[..self.taps].split_at(self.pos);
        let (head, tail) = self.coeffs[..self.taps].split_at(recent.len());
        let mut acc = 0.0;
        for (c, h) in head.iter().zip(recent) {
            acc += c * h;
        }
        for (c, h) in tail.iter().zip(wrapped) {
            acc += c * h;
        }
        acc
    }

    /// Clear the interpolator and FIR history.
    pub fn reset(&mut self) {
        self.history = [0.0; MAX_TAPS];
        self.pos = 0;
        self.prev_input = 0.0;
    }
}
