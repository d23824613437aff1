//! DC blocking filter for the saturation core output.
//!
//! First-order highpass (Julius O. Smith's DC blocker):
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R*z^-1)
//! y[n] = x[n] - x[n-1] + R * y[n-1]
//! ```
//!
//! Asymmetric shapers (triode, BJT, diode, rectify, the biased soft tanh)
//! produce a DC component that grows with drive. The pole sits at
//! `R = 1 - 220 / sample_rate`, about 35 Hz at any rate, which removes that
//! offset fast enough to keep the following filters centred.
//!
//! The 220 in the coefficient is not the corner frequency. The -3 dB point
//! is `220 / 2π ≈ 35 Hz`.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", Chapter on DC Blocker.

/// Coefficient used before the first `set_sample_rate` call.
const DEFAULT_COEFF: f64 = 0.995;

/// DC blocking filter using a first-order highpass.
///
/// The coefficient is not clamped. At rates below 220 Hz it goes negative,
/// which is a caller contract violation rather than a crash hazard.
///
/// ## Example
///
/// ```rust
/// use ember_core::DcBlocker;
///
/// let mut blocker = DcBlocker::new(48000.0);
/// let mut y = 0.0;
/// for _ in 0..48000 {
///     y = blocker.process(0.25);
/// }
/// assert!(y.abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    /// R coefficient (pole position)
    coeff: f64,
    /// Previous input sample x[n-1]
    x_prev: f64,
    /// Previous output sample y[n-1]
    y_prev: f64,
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::with_coeff(DEFAULT_COEFF)
    }
}

impl DcBlocker {
    /// Create a DC blocker tuned for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_coeff(Self::coeff_for(sample_rate))
    }

    /// Create a DC blocker with an explicit R coefficient.
    pub fn with_coeff(coeff: f64) -> Self {
        Self {
            coeff,
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// The R coefficient for a given rate: `1 - 220 / sample_rate`.
    pub fn coeff_for(sample_rate: f64) -> f64 {
        1.0 - 220.0 / sample_rate
    }

    /// Process a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = input - self.x_prev + self.coeff * self.y_prev;
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    /// Recompute R for a new sample rate. State is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.coeff = Self::coeff_for(sample_rate);
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// `(x[n-1], y[n-1])`.
    pub fn state(&self) -> (f64, f64) {
        (self.x_prev, self.y_prev)
    }
}
