//! Anti-Derivative Anti-Aliasing (ADAA) for static waveshapers.
//!
//! First-order ADAA replaces `y = f(x)` with the average of `f` over the
//! interval swept since the previous sample:
//!
//! ```text
//! y[n] = (F(x[n]) − F(x[n−1])) / (x[n] − x[n−1])
//! ```
//!
//! where `F` is the first antiderivative of `f`. When consecutive inputs are
//! closer than [`ADAA_EPSILON`] the quotient cancels catastrophically, so the
//! processor evaluates `f(x[n])` directly instead.
//!
//! The waveshapers used by the saturation core are parameterised by a
//! per-sample `character` control, so [`Adaa1`] does not own its functions:
//! the caller passes `F` and `f` on every call, usually as closures that
//! capture the current parameter.
//!
//! # Reference
//!
//! Parker et al., "Reducing the Aliasing of Nonlinear Waveshaping Using
//! Continuous-Time Convolution", Proceedings of the 19th International
//! Conference on Digital Audio Effects (DAFx-2016), Brno, Czech Republic.
//!
//! # Example
//!
//! ```rust
//! use ember_core::Adaa1;
//!
//! let mut adaa = Adaa1::new();
//! let f = |x: f64| libm::tanh(x);
//! let big_f = |x: f64| libm::log(libm::cosh(x));
//! let y = adaa.process(0.5, big_f, f);
//! assert!(y.abs() < 1.0);
//! ```

/// Minimum input difference for the finite-difference quotient.
///
/// Below this the processor falls back to `f(x)`.
pub const ADAA_EPSILON: f64 = 1e-6;

/// First-order ADAA history: previous input and its antiderivative.
///
/// Both start at zero and are zeroed again by [`reset`](Self::reset). The
/// stored antiderivative is *not* re-seeded with `F(0)`, so a shaper with
/// `F(0) != 0` sees a one-sample transient when the first non-silent sample
/// arrives after a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adaa1 {
    /// Previous input sample.
    prev_x: f64,
    /// Antiderivative evaluated at the previous input.
    prev_ad: f64,
}

impl Adaa1 {
    /// Create a processor with zeroed history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single sample through the anti-aliased waveshaper.
    ///
    /// ```text
    /// y = (F(x) − F(x_prev)) / (x − x_prev)     if |x − x_prev| ≥ ε
    /// y = f(x)                                  otherwise
    /// ```
    ///
    /// The history is updated on both branches.
    #[inline]
    pub fn process<AF, F>(&mut self, x: f64, antiderivative: AF, waveshaper: F) -> f64
    where
        AF: Fn(f64) -> f64,
        F: Fn(f64) -> f64,
    {
        let ad = antiderivative(x);
        let diff = x - self.prev_x;

        let result = if diff.abs() < ADAA_EPSILON {
            waveshaper(x)
        } else {
            (ad - self.prev_ad) / diff
        };

        self.prev_x = x;
        self.prev_ad = ad;
        result
    }

    /// Previous input sample.
    pub fn prev_x(&self) -> f64 {
        self.prev_x
    }

    /// Antiderivative at the previous input.
    pub fn prev_ad(&self) -> f64 {
        self.prev_ad
    }

    /// Zero the history.
    pub fn reset(&mut self) {
        self.prev_x = 0.0;
        self.prev_ad = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::vec::Vec;

    fn tanh(x: f64) -> f64 {
        libm::tanh(x)
    }

    fn ln_cosh(x: f64) -> f64 {
        libm::log(libm::cosh(x))
    }

    #[test]
    fn test_adaa_smoother_than_raw() {
        let mut adaa = Adaa1::new();
        let input: Vec<f64> = (0..128).map(|i| if i < 64 { 0.0 } else { 0.8 }).collect();

        let raw: Vec<f64> = input.iter().map(|&x| tanh(x)).collect();
        let smoothed: Vec<f64> = input
            .iter()
            .map(|&x| adaa.process(x, ln_cosh, tanh))
            .collect();

        let raw_hf: f64 = raw.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let adaa_hf: f64 = smoothed.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        assert!(adaa_hf <= raw_hf, "adaa_hf={adaa_hf}, raw_hf={raw_hf}");
    }

    #[test]
    fn test_fallback_evaluates_derivative_at_x() {
        let mut adaa = Adaa1::new();
        let _ = adaa.process(0.5, ln_cosh, tanh);
        let y = adaa.process(0.5, ln_cosh, tanh);
        assert_eq!(y, tanh(0.5));
    }

    #[test]
    fn test_history_updates_on_fallback() {
        let mut adaa = Adaa1::new();
        adaa.process(0.3, ln_cosh, tanh);
        adaa.process(0.3 + 1e-8, ln_cosh, tanh);
        assert_eq!(adaa.prev_x(), 0.3 + 1e-8);
        assert_eq!(adaa.prev_ad(), ln_cosh(0.3 + 1e-8));
    }

    #[test]
    fn test_identity_averages_neighbours() {
        // F(x) = x²/2 turns the quotient into (x + x_prev) / 2.
        let mut adaa = Adaa1::new();
        let half_sq = |x: f64| 0.5 * x * x;
        let id = |x: f64| x;
        adaa.process(0.2, half_sq, id);
        let y = adaa.process(0.6, half_sq, id);
        assert!((y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_reset_zeroes_history() {
        let mut adaa = Adaa1::new();
        adaa.process(1.0, ln_cosh, tanh);
        adaa.reset();
        assert_eq!(adaa, Adaa1::new());
        assert_eq!(adaa.process(0.0, ln_cosh, tanh), 0.0);
    }
}
