//! Fractional delay line for latency compensation.
//!
//! The oversampler delays the wet path by a fractional number of host
//! samples. [`InterpolatedDelay`] delays the dry path by the same amount so
//! the two line up when they are mixed.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular delay line with linear interpolation (heap-allocated).
///
/// The buffer is allocated once in [`new`](Self::new) and never grows.
/// Delays are clamped to `capacity - 1`.
///
/// # Example
///
/// ```rust
/// use ember_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(16);
/// assert_eq!(delay.process(1.0, 1.5), 0.0);
/// assert_eq!(delay.process(0.0, 1.5), 0.5);
/// assert_eq!(delay.process(0.0, 1.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    /// Slot holding the most recent sample.
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Number of samples the buffer holds.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Store a new sample.
    #[inline]
    pub fn push(&mut self, input: f32) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.buffer[self.write_pos] = input;
    }

    /// Read `delay_samples` behind the most recent sample. `0.0` returns it.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 1) as f32);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = (self.write_pos + len - whole) % len;
        if frac == 0.0 {
            return self.buffer[newer];
        }
        let older = (newer + len - 1) % len;
        self.buffer[newer] + frac * (self.buffer[older] - self.buffer[newer])
    }

    /// Push `input`, then read `delay_samples` back.
    #[inline]
    pub fn process(&mut self, input: f32, delay_samples: f32) -> f32 {
        self.push(input);
        self.read(delay_samples)
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_is_identity() {
        let mut d = InterpolatedDelay::new(8);
        for &x in &[0.3, -0.2, 0.9] {
            assert_eq!(d.process(x, 0.0), x);
        }
    }

    #[test]
    fn test_integer_delay() {
        let mut d = InterpolatedDelay::new(8);
        let out: Vec<f32> = (1..=6).map(|i| d.process(i as f32, 3.0)).collect();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let mut d = InterpolatedDelay::new(8);
        d.push(0.0);
        d.push(1.0);
        d.push(2.0);
        assert!((d.read(0.25) - 1.75).abs() < 1e-6);
        assert!((d.read(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_delay_clamped_to_capacity() {
        let mut d = InterpolatedDelay::new(4);
        for i in 0..4 {
            d.push(i as f32);
        }
        assert_eq!(d.read(100.0), 0.0);
        assert_eq!(d.read(3.0), 0.0);
    }

    #[test]
    fn test_clear() {
        let mut d = InterpolatedDelay::new(4);
        d.push(1.0);
        d.clear();
        assert_eq!(d.read(0.0), 0.0);
        assert_eq!(d.read(3.0), 0.0);
    }
}
