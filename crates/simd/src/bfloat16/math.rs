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

//! Elementwise math. Sign manipulation is exact on the bit patterns; everything
//! else widens, evaluates each lane in `f32` and rounds once.

use super::packed::{Bf16x16, Mask16x16};
use crate::special;
use crate::v128::F32x4;

const SIGN: u16 = 0x8000;

macro_rules! unary {
    ($($name:ident => $f:expr,)*) => {
        impl Bf16x16 {
            $(
                #[inline]
                pub fn $name(self) -> Bf16x16 {
                    self.map_lanes($f)
                }
            )*
        }
    };
}

macro_rules! binary {
    ($($name:ident => $f:expr,)*) => {
        impl Bf16x16 {
            $(
                #[inline]
                pub fn $name(self, other: Bf16x16) -> Bf16x16 {
                    self.zip_lanes(other, $f)
                }
            )*
        }
    };
}

fn angle(x: f32) -> f32 {
    if x.is_nan() {
        x
    } else if x < 0.0 {
        core::f32::consts::PI
    } else {
        0.0
    }
}

fn max_propagate_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() {
        a
    } else if b.is_nan() {
        b
    } else {
        a.max(b)
    }
}

fn min_propagate_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() {
        a
    } else if b.is_nan() {
        b
    } else {
        a.min(b)
    }
}

unary! {
    acos => f32::acos,
    asin => f32::asin,
    atan => f32::atan,
    erf => libm::erff,
    erfc => libm::erfcf,
    erfinv => special::erfinv,
    exp => f32::exp,
    expm1 => libm::expm1f,
    i0 => special::i0,
    i0e => special::i0e,
    lgamma => libm::lgammaf,
    log => f32::ln,
    log2 => f32::log2,
    log10 => f32::log10,
    log1p => libm::log1pf,
    sin => f32::sin,
    sinh => f32::sinh,
    cos => f32::cos,
    cosh => f32::cosh,
    tan => f32::tan,
    tanh => f32::tanh,
    ceil => f32::ceil,
    floor => f32::floor,
    round => f32::round_ties_even,
    trunc => f32::trunc,
    frac => |x: f32| x - x.trunc(),
    angle => angle,
}

binary! {
    atan2 => f32::atan2,
    fmod => |a: f32, b: f32| a % b,
    hypot => f32::hypot,
    igamma => special::igamma,
    igammac => special::igammac,
    pow => f32::powf,
}

impl Bf16x16 {
    #[inline(always)]
    pub fn map_lanes(self, f: impl Fn(f32) -> f32) -> Bf16x16 {
        Bf16x16::from_wide(self.widen().map_lanes(f))
    }

    #[inline(always)]
    pub fn zip_lanes(self, other: Bf16x16, f: impl Fn(f32, f32) -> f32) -> Bf16x16 {
        Bf16x16::from_wide(self.widen().zip_lanes(other.widen(), f))
    }

    #[inline]
    pub fn abs(self) -> Bf16x16 {
        self & Bf16x16::splat_bits(!SIGN)
    }

    #[inline]
    pub fn neg(self) -> Bf16x16 {
        -self
    }

    #[inline]
    pub fn real(self) -> Bf16x16 {
        self
    }

    #[inline]
    pub fn imag(self) -> Bf16x16 {
        Bf16x16::zero()
    }

    #[inline]
    pub fn conj(self) -> Bf16x16 {
        self
    }

    /// Magnitude of `self`, sign of `sign`.
    #[inline]
    pub fn copysign(self, sign: Bf16x16) -> Bf16x16 {
        self.abs() | (sign & Bf16x16::splat_bits(SIGN))
    }

    #[inline]
    pub fn sqrt(self) -> Bf16x16 {
        Bf16x16::from_wide(self.widen().map(F32x4::sqrt))
    }

    #[inline]
    pub fn reciprocal(self) -> Bf16x16 {
        let one = F32x4::splat(1.0);
        Bf16x16::from_wide(self.widen().map(|x| one.div(x)))
    }

    #[inline]
    pub fn rsqrt(self) -> Bf16x16 {
        let one = F32x4::splat(1.0);
        Bf16x16::from_wide(self.widen().map(|x| one.div(x.sqrt())))
    }

    /// Bit `i` is set when lane `i` is `±0.0`.
    #[inline]
    pub fn zero_mask(self) -> u16 {
        Mask16x16::from_lanes(self.cmp_eq(Bf16x16::zero())).to_bitmask()
    }
}

/// Lanewise maximum. NaN in either operand gives NaN.
#[inline]
pub fn maximum(a: Bf16x16, b: Bf16x16) -> Bf16x16 {
    a.zip_lanes(b, max_propagate_nan)
}

/// Lanewise minimum. NaN in either operand gives NaN.
#[inline]
pub fn minimum(a: Bf16x16, b: Bf16x16) -> Bf16x16 {
    a.zip_lanes(b, min_propagate_nan)
}

#[inline]
pub fn clamp(a: Bf16x16, min: Bf16x16, max: Bf16x16) -> Bf16x16 {
    minimum(maximum(a, min), max)
}

#[inline]
pub fn clamp_min(a: Bf16x16, min: Bf16x16) -> Bf16x16 {
    maximum(a, min)
}

#[inline]
pub fn clamp_max(a: Bf16x16, max: Bf16x16) -> Bf16x16 {
    minimum(a, max)
}
