//! Audio file I/O for the ember saturator.
//!
//! - **WAV files**: [`read_wav_stereo`] and [`write_wav_stereo`] load and
//!   save 16/24-bit PCM and 32-bit float files as [`StereoSamples`]
//! - **Metadata**: [`read_wav_info`] reads the header only
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ember_effects::Saturator;
//! use ember_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (mut samples, spec) = read_wav_stereo("input.wav")?;
//! let mut sat = Saturator::new(f64::from(spec.sample_rate));
//! sat.process_block(&mut samples.left, &mut samples.right);
//! write_wav_stereo("output.wav", &samples, spec)?;
//! ```

mod stereo;
mod wav;

pub use stereo::StereoSamples;
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
