//! Transfer curves and their antiderivatives.
//!
//! Every ADAA algorithm is a pair `(F, f)` with `F' = f`, both taking the
//! shaper input `x` and the `character` control `c ∈ [0, 1]`. `f` is only
//! evaluated when consecutive inputs are nearly equal; everywhere else the
//! core differentiates `F` numerically.
//!
//! Near-zero branches replace expressions that are 0/0 at the origin with
//! their Taylor leading terms.

use core::f64::consts::{LN_2, PI};
use libm::{cos, exp, log, log1p, sin, sinh, sqrt, tanh};

/// Below this magnitude the Langevin and Frohlich forms use Taylor terms.
const SMALL_X: f64 = 1.0e-5;

// Tape: 3 × Langevin function L(x) = coth x − 1/x.

/// Antiderivative of the Langevin curve: `3·ln(sinh x / x)`.
pub fn tape_ad(x: f64, _c: f64) -> f64 {
    if x.abs() < SMALL_X {
        return 3.0 * (x * x / 6.0);
    }
    3.0 * log((sinh(x) / x).abs())
}

/// Langevin curve `3·(coth x − 1/x)`.
pub fn tape(x: f64, _c: f64) -> f64 {
    if x.abs() < SMALL_X {
        return 3.0 * (x / 3.0);
    }
    3.0 * (1.0 / tanh(x) - 1.0 / x)
}

// Triode: rational compression of the positive half, linear negative half.

#[inline]
fn triode_k(c: f64) -> f64 {
    0.5 + c * 1.5
}

/// Triode antiderivative.
pub fn triode_ad(x: f64, c: f64) -> f64 {
    let k = triode_k(c);
    if x > 0.0 {
        x / k - log(1.0 + k * x) / (k * k)
    } else {
        0.5 * x * x
    }
}

/// Triode curve: `x / (1 + kx)` for `x > 0`, else `x`.
pub fn triode(x: f64, c: f64) -> f64 {
    let k = triode_k(c);
    if x > 0.0 { x / (1.0 + k * x) } else { x }
}

/// Pentode antiderivative: `x²/2 − x⁴/12`.
pub fn pentode_ad(x: f64, _c: f64) -> f64 {
    0.5 * x * x - x * x * x * x * 0.08333333
}

/// Pentode curve: `x − x³/3`.
pub fn pentode(x: f64, _c: f64) -> f64 {
    x - x * x * x / 3.0
}

// Transformer: Frohlich hysteresis-free magnetisation curve.

#[inline]
fn transformer_b(c: f64) -> f64 {
    0.5 + c * 0.5
}

/// Frohlich antiderivative: `|x|/b − ln(1 + b|x|)/b²`.
pub fn transformer_ad(x: f64, c: f64) -> f64 {
    if x.abs() < SMALL_X {
        return x * x / 2.0;
    }
    let b = transformer_b(c);
    let abs_x = x.abs();
    abs_x / b - log(1.0 + b * abs_x) / (b * b)
}

/// Frohlich curve: `x / (1 + b|x|)`.
pub fn transformer(x: f64, c: f64) -> f64 {
    x / (1.0 + transformer_b(c) * x.abs())
}

/// Console antiderivative: `√(1 + x²)`.
pub fn console_ad(x: f64, _c: f64) -> f64 {
    sqrt(1.0 + x * x)
}

/// Console curve: `x / √(1 + x²)`.
pub fn console(x: f64, _c: f64) -> f64 {
    x / sqrt(1.0 + x * x)
}

#[inline]
fn jfet_a(c: f64) -> f64 {
    0.2 + c * 0.3
}

/// JFET antiderivative: `x²/2 − a·x³/3`.
pub fn jfet_ad(x: f64, c: f64) -> f64 {
    0.5 * x * x - jfet_a(c) * x * x * x / 3.0
}

/// JFET curve: `x − a·x²`, even-order asymmetry.
pub fn jfet(x: f64, c: f64) -> f64 {
    x - jfet_a(c) * x * x
}

#[inline]
fn bjt_k(c: f64) -> f64 {
    0.1 + c * 5.0
}

/// BJT antiderivative, continuous at 0.
pub fn bjt_ad(x: f64, c: f64) -> f64 {
    let k = bjt_k(c);
    if x > 0.0 {
        x / k + exp(-k * x) / (k * k) - 1.0 / (k * k)
    } else {
        0.5 * x * x
    }
}

/// BJT curve: `(1 − e^(−kx))/k` for `x > 0`, else `x`.
pub fn bjt(x: f64, c: f64) -> f64 {
    let k = bjt_k(c);
    if x > 0.0 { (1.0 - exp(-k * x)) / k } else { x }
}

#[inline]
fn diode_k(c: f64) -> f64 {
    1.5 + c * 3.0
}

/// Diode antiderivative: `(|x| + e^(−k|x|)/k) / k`.
pub fn diode_ad(x: f64, c: f64) -> f64 {
    let k = diode_k(c);
    let abs_x = x.abs();
    (abs_x + exp(-k * abs_x) / k) / k
}

/// Diode curve: `sign(x)·(1 − e^(−k|x|))/k`.
pub fn diode(x: f64, c: f64) -> f64 {
    let k = diode_k(c);
    if x > 0.0 {
        (1.0 - exp(-k * x)) / k
    } else {
        (-1.0 + exp(k * x)) / k
    }
}

/// `ln cosh x`, written as `|x| + ln(1 + e^(−2|x|)) − ln 2` so it never
/// overflows.
pub fn soft_tanh_ad(x: f64, _c: f64) -> f64 {
    let a = x.abs();
    a + log1p(exp(-2.0 * a)) - LN_2
}

/// `tanh x`.
pub fn soft_tanh(x: f64, _c: f64) -> f64 {
    tanh(x)
}

/// Hard clip antiderivative: `x²/2` inside ±1, `|x| − 1/2` outside.
pub fn hard_clip_ad(x: f64, _c: f64) -> f64 {
    if x < -1.0 {
        -x - 0.5
    } else if x > 1.0 {
        x - 0.5
    } else {
        0.5 * x * x
    }
}

/// `clamp(x, −1, 1)`.
pub fn hard_clip(x: f64, _c: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Fold frequency `w = (0.5 + 2.5c)·π`.
#[inline]
fn wavefold_w(c: f64) -> f64 {
    (0.5 + c * 2.5) * PI
}

/// Wavefold antiderivative: `−cos(wx)/w`.
pub fn wavefold_ad(x: f64, c: f64) -> f64 {
    let w = wavefold_w(c);
    -cos(x * w) / w
}

/// Sine fold `sin(wx)`.
pub fn wavefold(x: f64, c: f64) -> f64 {
    sin(x * wavefold_w(c))
}

/// Rectifier antiderivative: `x·|x|/2`.
pub fn rectify_ad(x: f64, _c: f64) -> f64 {
    0.5 * x * x.abs()
}

/// Full-wave rectifier `|x|`.
pub fn rectify(x: f64, _c: f64) -> f64 {
    x.abs()
}
