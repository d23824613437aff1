//! The fourteen saturation algorithms and their dispatch records.

use super::shapers;

/// Signature shared by every transfer curve and antiderivative: `(x, character)`.
pub type ShaperFn = fn(f64, f64) -> f64;

/// An ADAA pair: `antiderivative' == derivative`.
#[derive(Clone, Copy, Debug)]
pub struct AdaaPair {
    /// `F(x, c)`.
    pub antiderivative: ShaperFn,
    /// `f(x, c)`, evaluated only on the near-equal-input fallback.
    pub derivative: ShaperFn,
}

/// Static per-algorithm record consulted once per sample.
#[derive(Clone, Copy, Debug)]
pub struct Shaper {
    /// The ADAA pair, or `None` for the direct-evaluation algorithms.
    pub adaa: Option<AdaaPair>,
    /// Fixed output multiplier.
    pub makeup_gain: f64,
    /// Whether the sag envelope modulates the drive.
    pub uses_sag: bool,
}

impl Shaper {
    /// Whether this algorithm runs through the ADAA path.
    pub fn uses_adaa(&self) -> bool {
        self.adaa.is_some()
    }
}

const fn adaa(
    antiderivative: ShaperFn,
    derivative: ShaperFn,
    makeup_gain: f64,
    uses_sag: bool,
) -> Shaper {
    Shaper {
        adaa: Some(AdaaPair {
            antiderivative,
            derivative,
        }),
        makeup_gain,
        uses_sag,
    }
}

const fn direct() -> Shaper {
    Shaper {
        adaa: None,
        makeup_gain: 1.0,
        uses_sag: false,
    }
}

/// Indexed by [`Algorithm::index`].
static SHAPERS: [Shaper; Algorithm::COUNT] = [
    adaa(shapers::tape_ad, shapers::tape, 1.0, true),
    adaa(shapers::triode_ad, shapers::triode, 1.0, true),
    adaa(shapers::pentode_ad, shapers::pentode, 1.2, true),
    adaa(shapers::transformer_ad, shapers::transformer, 1.1, true),
    adaa(shapers::console_ad, shapers::console, 1.0, true),
    adaa(shapers::jfet_ad, shapers::jfet, 1.4, true),
    adaa(shapers::bjt_ad, shapers::bjt, 1.0, true),
    adaa(shapers::diode_ad, shapers::diode, 1.0, false),
    adaa(shapers::soft_tanh_ad, shapers::soft_tanh, 1.0, false),
    adaa(shapers::hard_clip_ad, shapers::hard_clip, 1.0, false),
    adaa(shapers::wavefold_ad, shapers::wavefold, 3.2, false),
    adaa(shapers::rectify_ad, shapers::rectify, 1.0, false),
    direct(),
    direct(),
];

/// Saturation algorithm. Discriminants are the stable indices 0..=13.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Langevin magnetisation curve with pre/de-emphasis.
    #[default]
    Tape = 0,
    /// Asymmetric rational tube curve.
    Triode = 1,
    /// Cubic odd-harmonic curve.
    Pentode = 2,
    /// Frohlich curve with low-frequency emphasis.
    Transformer = 3,
    /// Algebraic sigmoid.
    Console = 4,
    /// Quadratic even-harmonic curve.
    Jfet = 5,
    /// One-sided exponential compression.
    Bjt = 6,
    /// Symmetric exponential clipper.
    Diode = 7,
    /// `tanh` with a character-controlled bias.
    SoftTanh = 8,
    /// `clamp(x, −1, 1)`.
    HardClip = 9,
    /// Sine wavefolder.
    Wavefold = 10,
    /// Full-wave rectifier blended with the dry signal.
    Rectify = 11,
    /// Sample-and-hold plus bit-depth reduction.
    Bitcrush = 12,
    /// High-passed soft-clip blended back onto the input.
    Exciter = 13,
}

impl Algorithm {
    /// Number of algorithms.
    pub const COUNT: usize = 14;

    /// All algorithms in index order.
    pub const ALL: [Algorithm; Self::COUNT] = [
        Algorithm::Tape,
        Algorithm::Triode,
        Algorithm::Pentode,
        Algorithm::Transformer,
        Algorithm::Console,
        Algorithm::Jfet,
        Algorithm::Bjt,
        Algorithm::Diode,
        Algorithm::SoftTanh,
        Algorithm::HardClip,
        Algorithm::Wavefold,
        Algorithm::Rectify,
        Algorithm::Bitcrush,
        Algorithm::Exciter,
    ];

    /// Stable index 0..=13.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Algorithm for a stable index, `None` above 13.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Machine-readable identifier used in preset files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Tape => "tape",
            Algorithm::Triode => "triode",
            Algorithm::Pentode => "pentode",
            Algorithm::Transformer => "transformer",
            Algorithm::Console => "console",
            Algorithm::Jfet => "jfet",
            Algorithm::Bjt => "bjt",
            Algorithm::Diode => "diode",
            Algorithm::SoftTanh => "soft_tanh",
            Algorithm::HardClip => "hard_clip",
            Algorithm::Wavefold => "wavefold",
            Algorithm::Rectify => "rectify",
            Algorithm::Bitcrush => "bitcrush",
            Algorithm::Exciter => "exciter",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Tape => "Analog Tape",
            Algorithm::Triode => "Tube Triode",
            Algorithm::Pentode => "Tube Pentode",
            Algorithm::Transformer => "Transformer",
            Algorithm::Console => "Console",
            Algorithm::Jfet => "JFET",
            Algorithm::Bjt => "BJT",
            Algorithm::Diode => "Diode",
            Algorithm::SoftTanh => "Soft Tanh",
            Algorithm::HardClip => "Hard Clip",
            Algorithm::Wavefold => "Wavefold",
            Algorithm::Rectify => "Rectify",
            Algorithm::Bitcrush => "Bitcrush",
            Algorithm::Exciter => "Exciter",
        }
    }

    /// Look up by [`id`](Self::id), case-insensitively. `-` is accepted for `_`.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| {
            let want = a.id();
            want.len() == id.len()
                && want
                    .bytes()
                    .zip(id.bytes())
                    .all(|(w, g)| w == g.to_ascii_lowercase() || (w == b'_' && g == b'-'))
        })
    }

    /// Dispatch record for this algorithm.
    pub fn shaper(self) -> &'static Shaper {
        &SHAPERS[self.index()]
    }
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
