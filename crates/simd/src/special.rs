// This software is licensed under a dual license model:
//
// GNU Affero General Public License v3 (AGPLv3): You may use, modify, and
// distribute this software under the terms of the AGPLv3.
//
// Elastic License v2 (ELv2): You may also use, modify, and distribute this
// software under the Elastic License v2, which has specific restrictions.
//
// We welcome any commercial collaboration or support. For inquiries
// regarding the licenses, please contact us at:
// vectorchord-inquiry@tensorchord.ai
//
// Copyright (c) 2025 TensorChord Inc.

//! Special functions missing from `libm`. Inputs and outputs are `f32`, the
//! evaluation is done in `f64`.

const EPSILON: f64 = 1e-15;
const TINY: f64 = 1e-300;
const MAX_ITERATIONS: usize = 500;
/// Above this shape parameter both incomplete gamma forms switch to the
/// uniform asymptotic expansion.
const LARGE_A: f64 = 1000.0;

/// Inverse error function. `±1` maps to `±∞`, `|x| > 1` to NaN.
pub fn erfinv(x: f32) -> f32 {
    let x = x as f64;
    if x.is_nan() || x.abs() > 1.0 {
        return f32::NAN;
    }
    if x.abs() == 1.0 {
        return (x * f64::INFINITY) as f32;
    }
    // M. Giles, "Approximating the erfinv function".
    let mut w = -((1.0 - x) * (1.0 + x)).ln();
    let p = if w < 5.0 {
        w -= 2.5;
        let mut p = 2.81022636e-08;
        p = 3.43273939e-07 + p * w;
        p = -3.5233877e-06 + p * w;
        p = -4.39150654e-06 + p * w;
        p = 0.00021858087 + p * w;
        p = -0.00125372503 + p * w;
        p = -0.00417768164 + p * w;
        p = 0.246640727 + p * w;
        1.50140941 + p * w
    } else {
        w = w.sqrt() - 3.0;
        let mut p = -0.000200214257;
        p = 0.000100950558 + p * w;
        p = 0.00134934322 + p * w;
        p = -0.00367342844 + p * w;
        p = 0.00573950773 + p * w;
        p = -0.0076224613 + p * w;
        p = 0.00943887047 + p * w;
        p = 1.00167406 + p * w;
        2.83297682 + p * w
    };
    let mut y = p * x;
    // one Newton step on erf(y) = x
    let derivative = core::f64::consts::FRAC_2_SQRT_PI * (-y * y).exp();
    if derivative > 0.0 {
        y -= (libm::erf(y) - x) / derivative;
    }
    y as f32
}

/// `x^{1/2} e^{-x} I0(x)` for `x >= 3.75`.
fn i0_asymptotic(x: f64) -> f64 {
    let t = 3.75 / x;
    let p = 0.00392377;
    let p = -0.01647633 + p * t;
    let p = 0.02635537 + p * t;
    let p = -0.02057706 + p * t;
    let p = 0.00916281 + p * t;
    let p = -0.00157565 + p * t;
    let p = 0.00225319 + p * t;
    let p = 0.01328592 + p * t;
    0.39894228 + p * t
}

/// `I0(x)` for `x < 3.75`.
fn i0_small(x: f64) -> f64 {
    let t = (x / 3.75) * (x / 3.75);
    let p = 0.0045813;
    let p = 0.0360768 + p * t;
    let p = 0.2659732 + p * t;
    let p = 1.2067492 + p * t;
    let p = 3.0899424 + p * t;
    let p = 3.5156229 + p * t;
    1.0 + p * t
}

/// Modified Bessel function of the first kind, order zero.
pub fn i0(x: f32) -> f32 {
    let x = (x as f64).abs();
    if x.is_nan() {
        return f32::NAN;
    }
    if x < 3.75 {
        i0_small(x) as f32
    } else {
        (i0_asymptotic(x) * x.exp() / x.sqrt()) as f32
    }
}

/// Exponentially scaled `I0`: `exp(-|x|) * I0(x)`.
pub fn i0e(x: f32) -> f32 {
    let x = (x as f64).abs();
    if x.is_nan() {
        return f32::NAN;
    }
    if x < 3.75 {
        (i0_small(x) * (-x).exp()) as f32
    } else {
        (i0_asymptotic(x) / x.sqrt()) as f32
    }
}

/// `exp(-x) x^a / Γ(a)`, the common prefactor of both incomplete gamma forms.
fn gamma_prefactor(a: f64, x: f64) -> f64 {
    (a * x.ln() - x - libm::lgamma(a)).exp()
}

/// Near `x = a` both expansions need on the order of `sqrt(a)` terms.
fn iterations(a: f64) -> usize {
    MAX_ITERATIONS.max((20.0 * a.sqrt()) as usize)
}

fn lower_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..iterations(a) {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * EPSILON {
            break;
        }
    }
    sum * gamma_prefactor(a, x)
}

fn upper_continued_fraction(a: f64, x: f64) -> f64 {
    // modified Lentz
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=iterations(a) {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    gamma_prefactor(a, x) * h
}

/// Temme's uniform expansion for large `a`, truncated after the first
/// correction term: `Q(a, x) = erfc(eta * sqrt(a / 2)) / 2 + r` and
/// `P(a, x) = erfc(-eta * sqrt(a / 2)) / 2 - r`. Returns `(P, Q)`.
fn temme(a: f64, x: f64) -> (f64, f64) {
    let mu = (x - a) / a;
    let eta = {
        let t = (2.0 * (mu - mu.ln_1p())).max(0.0).sqrt();
        if mu < 0.0 { -t } else { t }
    };
    let c0 = if eta.abs() < 0.1 {
        let p = 1.0 / 2835.0;
        let p = 1.0 / 864.0 + p * eta;
        let p = -2.0 / 135.0 + p * eta;
        let p = 1.0 / 12.0 + p * eta;
        -1.0 / 3.0 + p * eta
    } else {
        1.0 / mu - 1.0 / eta
    };
    let r = (-0.5 * a * eta * eta).exp() / (2.0 * core::f64::consts::PI * a).sqrt() * c0;
    let z = eta * (0.5 * a).sqrt();
    (0.5 * libm::erfc(-z) - r, 0.5 * libm::erfc(z) + r)
}

/// Regularized lower incomplete gamma function `P(a, x)`.
pub fn igamma(a: f32, x: f32) -> f32 {
    let (a, x) = (a as f64, x as f64);
    if a.is_nan() || x.is_nan() || a < 0.0 || x < 0.0 {
        return f32::NAN;
    }
    if a == 0.0 {
        return if x > 0.0 { 1.0 } else { f32::NAN };
    }
    if x == 0.0 {
        return 0.0;
    }
    if a.is_infinite() {
        return if x.is_infinite() { f32::NAN } else { 0.0 };
    }
    if x.is_infinite() {
        return 1.0;
    }
    if a > LARGE_A {
        return temme(a, x).0 as f32;
    }
    if x < a + 1.0 {
        lower_series(a, x) as f32
    } else {
        (1.0 - upper_continued_fraction(a, x)) as f32
    }
}

/// Regularized upper incomplete gamma function `Q(a, x) = 1 - P(a, x)`.
pub fn igammac(a: f32, x: f32) -> f32 {
    let (a, x) = (a as f64, x as f64);
    if a.is_nan() || x.is_nan() || a < 0.0 || x < 0.0 {
        return f32::NAN;
    }
    if a == 0.0 {
        return if x > 0.0 { 0.0 } else { f32::NAN };
    }
    if x == 0.0 {
        return 1.0;
    }
    if a.is_infinite() {
        return if x.is_infinite() { f32::NAN } else { 1.0 };
    }
    if x.is_infinite() {
        return 0.0;
    }
    if a > LARGE_A {
        return temme(a, x).1 as f32;
    }
    if x < a + 1.0 {
        (1.0 - lower_series(a, x)) as f32
    } else {
        upper_continued_fraction(a, x) as f32
    }
}
