//! Linear parameter smoothing.
//!
//! Control values arrive from the host once per block, but the saturation
//! core and filters read them once per sample. [`LinearSmoothedParam`]
//! ramps from the current value to a new target at a constant rate over a
//! fixed transition time, so a drive or cutoff jump never reaches the DSP as
//! a step.
//!
//! ```text
//! samples   = transition_ms / 1000 · sample_rate
//! increment = (target − current) / samples
//! ```
//!
//! The last step snaps to the exact target so repeated ramps do not drift.

/// Default transition time in milliseconds.
pub const DEFAULT_TRANSITION_MS: f64 = 50.0;

/// Linearly smoothed parameter.
///
/// # Example
///
/// ```rust
/// use ember_core::LinearSmoothedParam;
///
/// let mut drive = LinearSmoothedParam::with_config(0.0, 48000.0, 50.0);
/// drive.set_target(12.0);
/// let first = drive.advance();
/// assert!(first > 0.0 && first < 12.0);
/// for _ in 0..2400 {
///     drive.advance();
/// }
/// assert_eq!(drive.get(), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    current: f64,
    target: f64,
    /// Per-sample step, signed.
    increment: f64,
    samples_remaining: u32,
    sample_rate: f64,
    transition_time_ms: f64,
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LinearSmoothedParam {
    /// Create at `initial`, 44.1 kHz, 50 ms transitions.
    pub fn new(initial: f64) -> Self {
        Self::with_config(initial, 44100.0, DEFAULT_TRANSITION_MS)
    }

    /// Create with full configuration.
    pub fn with_config(initial: f64, sample_rate: f64, transition_time_ms: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
            transition_time_ms,
        }
    }

    /// Start a ramp toward `target`. Ignored if it equals the current target.
    pub fn set_target(&mut self, target: f64) {
        if (target - self.target).abs() < 1e-12 {
            return;
        }
        self.target = target;

        let samples = (self.transition_time_ms / 1000.0 * self.sample_rate) as u32;
        if samples == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.current) / samples as f64;
            self.samples_remaining = samples;
        }
    }

    /// Set value and target at once, cancelling any ramp.
    pub fn set_immediate(&mut self, value: f64) {
        self.target = value;
        self.snap_to_target();
    }

    /// Change the sample rate and finish any ramp in progress.
    ///
    /// A ramp computed for the old rate would run at the wrong speed.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.snap_to_target();
    }

    /// Set the transition time in milliseconds. Applies to the next ramp.
    pub fn set_transition_time_ms(&mut self, time_ms: f64) {
        self.transition_time_ms = time_ms;
    }

    /// Step once and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f64 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f64 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the ramp has finished.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Jump to the target.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}
