//! Deinterleaved stereo buffers.

/// A pair of equal-length channel buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Wrap two channel buffers. The longer one is truncated to match.
    pub fn new(mut left: Vec<f32>, mut right: Vec<f32>) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self { left, right }
    }

    /// Duplicate a mono buffer to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Split an `L R L R ...` buffer. A trailing odd sample is dropped.
    pub fn from_interleaved(samples: &[f32]) -> Self {
        let (left, right) = samples
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();
        Self { left, right }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Duration in seconds at `sample_rate`.
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        self.len() as f64 / f64::from(sample_rate)
    }

    /// Largest magnitude across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// RMS across both channels.
    pub fn rms(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .left
            .iter()
            .chain(&self.right)
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum / (2 * self.len()) as f64).sqrt() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mono() {
        let mono = vec![1.0, 2.0, 3.0];
        let stereo = StereoSamples::from_mono(mono.clone());
        assert_eq!(stereo.left, mono);
        assert_eq!(stereo.right, mono);
    }

    #[test]
    fn test_from_interleaved() {
        let stereo = StereoSamples::from_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stereo.left, vec![1.0, 3.0]);
        assert_eq!(stereo.right, vec![2.0, 4.0]);
    }

    #[test]
    fn test_new_truncates() {
        let stereo = StereoSamples::new(vec![0.0; 5], vec![0.0; 3]);
        assert_eq!(stereo.len(), 3);
        assert_eq!(stereo.right.len(), 3);
    }

    #[test]
    fn test_levels() {
        let stereo = StereoSamples::new(vec![0.5, -0.5], vec![1.0, -1.0]);
        assert_eq!(stereo.peak(), 1.0);
        let expected = ((0.25 + 0.25 + 1.0 + 1.0) / 4.0f64).sqrt() as f32;
        assert!((stereo.rms() - expected).abs() < 1e-6);
        assert_eq!(StereoSamples::default().rms(), 0.0);
        assert!((stereo.duration_secs(2) - 1.0).abs() < 1e-12);
    }
}
