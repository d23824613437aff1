//! Multi-algorithm saturation core with first-order ADAA.
//!
//! [`SaturationCore`] runs one channel through one of fourteen transfer
//! characteristics ([`Algorithm`]). Per sample:
//!
//! 1. **Sag** (tape through BJT): an envelope on `|input|` pulls the drive
//!    down by up to 15 %, scaled by `drive_db / 12`.
//! 2. **Drive**: `x = input · 10^(drive_db/20) · sag`.
//! 3. **Pre-shaping**: tape pre-emphasis, transformer low-frequency boost,
//!    soft-tanh bias.
//! 4. **Shaping**: ADAA over the algorithm's `(F, f)` pair for tape through
//!    rectify; direct evaluation for bitcrush and exciter.
//! 5. **Post-shaping**: tape de-emphasis, rectify dry blend.
//! 6. **Makeup gain** and a DC blocker at `1 − 220/fs`.
//!
//! Every rate-dependent coefficient is normalised against 44.1 kHz, so the
//! tone stays the same when the core runs at an oversampled rate.
//!
//! # Reference
//!
//! - Parker et al., "Reducing the Aliasing of Nonlinear Waveshaping Using
//!   Continuous-Time Convolution", DAFx-2016.
//! - Jiles & Atherton, "Theory of ferromagnetic hysteresis" (1986), for the
//!   Langevin magnetisation curve.

mod algorithm;
pub mod shapers;

pub use algorithm::{AdaaPair, Algorithm, Shaper, ShaperFn};

use crate::{Adaa1, DcBlocker, db_to_linear};
use libm::{exp, pow, round};

/// Rate all coefficient tables were tuned at.
const REFERENCE_RATE: f64 = 44100.0;

/// Upper bound on the tape pre-emphasis coefficient. The recursion diverges at 1,
/// which the rate scaling reaches below about 26.5 kHz.
const TAPE_EMPHASIS_MAX: f64 = 0.95;

/// Maximum drive reduction from sag.
const SAG_DEPTH: f64 = 0.15;

/// Rate-derived coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    dc_blocker: f64,
    tape_base: f64,
    tape_deemph: f64,
    transformer: f64,
    exciter: f64,
    sag_attack: f64,
    sag_release: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            dc_blocker: 0.995,
            tape_base: 0.4,
            tape_deemph: 0.3,
            transformer: 0.1,
            exciter: 0.9,
            sag_attack: 0.0,
            sag_release: 0.0,
        }
    }
}

impl Coefficients {
    fn for_rate(sample_rate: f64) -> Self {
        let ratio = sample_rate / REFERENCE_RATE;
        Self {
            dc_blocker: DcBlocker::coeff_for(sample_rate),
            tape_base: 1.0 / ratio,
            tape_deemph: 0.3 / ratio,
            transformer: 0.1 / ratio,
            exciter: pow(0.9, 1.0 / ratio),
            sag_attack: 1.0 - exp(-1.0 / (0.02 * sample_rate)),
            sag_release: 1.0 - exp(-1.0 / (0.10 * sample_rate)),
        }
    }
}

/// One channel of the saturation engine.
///
/// `prepare` once per sample rate, then `process` once per sample. The
/// core does not validate its controls: `character` is expected in `[0, 1]`
/// and `drive_db` in the host's drive range.
///
/// # Example
///
/// ```rust
/// use ember_core::{Algorithm, SaturationCore};
///
/// let mut core = SaturationCore::new();
/// core.prepare(96000.0);
/// let y = core.process(0.25, Algorithm::Triode, 12.0, 0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SaturationCore {
    /// 0.0 until the first `prepare`.
    sample_rate: f64,
    coeffs: Coefficients,

    adaa: Adaa1,
    tape_state: f64,
    tape_deemph_state: f64,
    transformer_state: f64,
    exciter_prev: f64,
    hold_value: f64,
    hold_counter: f64,
    sag_envelope: f64,
    dc_blocker: DcBlocker,
}

impl SaturationCore {
    /// Create an unprepared core with 44.1 kHz-style default coefficients
    /// and zero sag smoothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute rate-dependent coefficients. No-op when the rate is unchanged.
    ///
    /// State is not touched; call [`reset`](Self::reset) as well after a
    /// real rate change.
    pub fn prepare(&mut self, sample_rate: f64) {
        if self.sample_rate == sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.coeffs = Coefficients::for_rate(sample_rate);
        self.dc_blocker.set_sample_rate(sample_rate);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            dc_coeff = self.coeffs.dc_blocker,
            exciter_coeff = self.coeffs.exciter,
            "saturation core prepared"
        );
    }

    /// Zero every piece of per-sample state.
    pub fn reset(&mut self) {
        self.adaa.reset();
        self.tape_state = 0.0;
        self.tape_deemph_state = 0.0;
        self.transformer_state = 0.0;
        self.exciter_prev = 0.0;
        self.hold_value = 0.0;
        self.hold_counter = 0.0;
        self.sag_envelope = 0.0;
        self.dc_blocker.reset();
    }

    /// Rate from the last `prepare`, 0.0 if never prepared.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current sag envelope.
    pub fn sag_envelope(&self) -> f64 {
        self.sag_envelope
    }

    /// Process one sample.
    #[inline]
    pub fn process(
        &mut self,
        input: f64,
        algorithm: Algorithm,
        drive_db: f64,
        character: f64,
    ) -> f64 {
        let shaper = algorithm.shaper();
        let c = character;

        let sag = if shaper.uses_sag {
            self.advance_sag(input.abs());
            let amount = (drive_db / 12.0).clamp(0.0, 1.0);
            1.0 - self.sag_envelope * SAG_DEPTH * amount
        } else {
            1.0
        };

        let mut x = input * db_to_linear(drive_db) * sag;

        match algorithm {
            Algorithm::Tape => {
                let coef = ((0.05 + 0.55 * c) * self.coeffs.tape_base).min(TAPE_EMPHASIS_MAX);
                let w = x - coef * self.tape_state;
                self.tape_state = w;
                x = w + coef * x;
            }
            Algorithm::Transformer => {
                self.transformer_state += self.coeffs.transformer * (x - self.transformer_state);
                x += self.transformer_state * (c * 2.0);
            }
            Algorithm::SoftTanh if c > 0.0 => x += c * 0.5,
            _ => {}
        }

        let dry_rect = x;

        if algorithm == Algorithm::Wavefold {
            x *= 0.2;
        }

        let mut out = match shaper.adaa {
            Some(AdaaPair {
                antiderivative,
                derivative,
            }) => self
                .adaa
                .process(x, |v| antiderivative(v, c), |v| derivative(v, c)),
            None => match algorithm {
                Algorithm::Bitcrush => self.bitcrush(x, c),
                _ => self.excite(x, c),
            },
        };

        match algorithm {
            Algorithm::Tape => {
                let d = self.coeffs.tape_deemph;
                self.tape_deemph_state = (1.0 - d) * self.tape_deemph_state + d * out;
                out = self.tape_deemph_state;
            }
            Algorithm::Rectify => out = dry_rect * (1.0 - c) + out * c,
            _ => {}
        }

        out *= shaper.makeup_gain;

        self.dc_blocker.process(out)
    }

    #[inline]
    fn advance_sag(&mut self, level: f64) {
        let coef = if level > self.sag_envelope {
            self.coeffs.sag_attack
        } else {
            self.coeffs.sag_release
        };
        self.sag_envelope += coef * (level - self.sag_envelope);
    }

    /// Sample-and-hold at `1 + 49c` samples, quantised to `16 − 14c` bits.
    #[inline]
    fn bitcrush(&mut self, x: f64, c: f64) -> f64 {
        let rate_div = 1.0 + c * 49.0;
        self.hold_counter += 1.0;
        if self.hold_counter >= rate_div {
            self.hold_counter = 0.0;
            self.hold_value = x;
        }
        let bits = (16.0 - c * 14.0).max(1.0);
        let steps = pow(2.0, bits);
        round(self.hold_value * steps) / steps
    }

    /// One-pole high-pass, driven into a one-sided soft clip, added back.
    #[inline]
    fn excite(&mut self, x: f64, c: f64) -> f64 {
        let hp = x - self.coeffs.exciter * self.exciter_prev;
        self.exciter_prev = x;
        let driven = hp * 1.5;
        let dist = if driven > 0.0 { driven / (1.0 + 0.5 * driven) } else { driven };
        x + (c * 2.0) * dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(sample_rate: f64) -> SaturationCore {
        let mut core = SaturationCore::new();
        core.prepare(sample_rate);
        core
    }

    #[test]
    fn test_coefficients_at_reference_rate() {
        let c = Coefficients::for_rate(44100.0);
        assert!((c.tape_base - 1.0).abs() < 1e-15);
        assert!((c.tape_deemph - 0.3).abs() < 1e-15);
        assert!((c.transformer - 0.1).abs() < 1e-15);
        assert!((c.exciter - 0.9).abs() < 1e-15);
        assert!((c.dc_blocker - (1.0 - 220.0 / 44100.0)).abs() < 1e-15);
    }

    #[test]
    fn test_coefficients_scale_with_rate() {
        let c = Coefficients::for_rate(88200.0);
        assert!((c.tape_base - 0.5).abs() < 1e-15);
        assert!((c.tape_deemph - 0.15).abs() < 1e-15);
        assert!((c.transformer - 0.05).abs() < 1e-15);
        assert!((c.exciter - libm::sqrt(0.9)).abs() < 1e-12);
        assert!((c.sag_attack - (1.0 - libm::exp(-1.0 / 1764.0))).abs() < 1e-15);
        assert!((c.sag_release - (1.0 - libm::exp(-1.0 / 8820.0))).abs() < 1e-15);
    }

    #[test]
    fn test_unprepared_defaults() {
        let core = SaturationCore::new();
        assert_eq!(core.sample_rate(), 0.0);
        assert_eq!(core.coeffs, Coefficients::default());
    }

    #[test]
    fn test_sag_only_on_first_seven() {
        for algo in Algorithm::ALL {
            let mut core = prepared(48000.0);
            for _ in 0..100 {
                core.process(0.8, algo, 12.0, 0.5);
            }
            assert_eq!(core.sag_envelope() > 0.0, algo.index() <= 6, "{algo}");
        }
    }

    #[test]
    fn test_bitcrush_quantises_to_sixteen_bits() {
        let mut core = prepared(48000.0);
        core.reset();
        // c = 0: hold every sample, 16 bits, then the DC blocker passes the
        // first sample unchanged.
        let x = 0.123456789;
        let y = core.process(x, Algorithm::Bitcrush, 0.0, 0.0);
        let steps = 65536.0;
        assert_eq!(y, libm::round(x * steps) / steps);
    }

    #[test]
    fn test_bitcrush_holds_for_rate_div_samples() {
        let mut core = prepared(48000.0);
        // c = 1: rate_div = 50, 2 bits.
        for _ in 0..49 {
            core.process(0.9, Algorithm::Bitcrush, 0.0, 1.0);
        }
        assert_eq!(core.hold_value, 0.0);
        core.process(0.9, Algorithm::Bitcrush, 0.0, 1.0);
        assert_eq!(core.hold_value, 0.9);
        assert_eq!(core.hold_counter, 0.0);
    }

    #[test]
    fn test_exciter_without_character_is_transparent() {
        let mut core = prepared(44100.0);
        let y = core.process(0.4, Algorithm::Exciter, 0.0, 0.0);
        assert!((y - 0.4).abs() < 1e-15);
    }

    #[test]
    fn test_exciter_tracks_its_own_history() {
        let mut core = prepared(44100.0);
        core.process(0.5, Algorithm::Exciter, 0.0, 1.0);
        assert_eq!(core.exciter_prev, 0.5);
        // ADAA history stays untouched by the direct path.
        assert_eq!(core.adaa, Adaa1::new());
    }

    #[test]
    fn test_prepare_same_rate_is_noop() {
        let mut a = prepared(48000.0);
        let mut b = prepared(48000.0);
        b.prepare(48000.0);
        for i in 0..64 {
            let x = libm::sin(i as f64 * 0.2) * 0.7;
            assert_eq!(
                a.process(x, Algorithm::Tape, 6.0, 0.5),
                b.process(x, Algorithm::Tape, 6.0, 0.5)
            );
        }
    }

    #[test]
    fn test_tape_stays_finite_at_low_rates() {
        for rate in [22050.0, 24000.0] {
            let mut core = prepared(rate);
            for i in 0..8192 {
                let x = 0.5 * libm::sin(core::f64::consts::TAU * 1000.0 * i as f64 / rate);
                let y = core.process(x, Algorithm::Tape, 12.0, 1.0);
                assert!(y.is_finite(), "{rate} Hz: sample {i} = {y}");
            }
            assert!(core.process(0.0, Algorithm::SoftTanh, 0.0, 0.0).is_finite());
        }
    }
}
