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

//! Operators. Arithmetic widens, computes in `f32` and rounds once; comparisons
//! produce `0xffff`/`0x0000` lanes; bitwise operators never widen.

use super::packed::Bf16x16;
use crate::bf16;
use crate::v128::F32x4;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

macro_rules! arithmetic {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl $trait for Bf16x16 {
            type Output = Bf16x16;

            #[inline(always)]
            fn $method(self, rhs: Bf16x16) -> Bf16x16 {
                Bf16x16::from_wide(self.widen().zip(rhs.widen(), F32x4::$method))
            }
        }

        impl $assign_trait for Bf16x16 {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Bf16x16) {
                *self = $trait::$method(*self, rhs);
            }
        }
    };
}

arithmetic!(Add, add, AddAssign, add_assign);
arithmetic!(Sub, sub, SubAssign, sub_assign);
arithmetic!(Mul, mul, MulAssign, mul_assign);
arithmetic!(Div, div, DivAssign, div_assign);

macro_rules! bitwise {
    ($trait:ident, $method:ident, $lanes:ident) => {
        impl $trait for Bf16x16 {
            type Output = Bf16x16;

            #[inline(always)]
            fn $method(self, rhs: Bf16x16) -> Bf16x16 {
                let ([a0, a1], [b0, b1]) = (self.halves(), rhs.halves());
                Bf16x16::from_halves(a0.$lanes(b0), a1.$lanes(b1))
            }
        }
    };
}

bitwise!(BitAnd, bitand, and);
bitwise!(BitOr, bitor, or);
bitwise!(BitXor, bitxor, xor);

impl Neg for Bf16x16 {
    type Output = Bf16x16;

    /// Flips the sign bit, NaN included.
    #[inline(always)]
    fn neg(self) -> Bf16x16 {
        self ^ Bf16x16::splat_bits(0x8000)
    }
}

macro_rules! comparison {
    ($($cmp:ident => $predicate:ident,)*) => {
        impl Bf16x16 {
            $(
                #[inline(always)]
                pub fn $cmp(self, other: Bf16x16) -> Bf16x16 {
                    Bf16x16::from_wide_truncating(self.widen().zip_mask(other.widen(), F32x4::$cmp))
                }

                #[inline(always)]
                pub fn $predicate(self, other: Bf16x16) -> Bf16x16 {
                    self.$cmp(other) & Bf16x16::splat(bf16::ONE)
                }
            )*
        }
    };
}

comparison! {
    cmp_eq => eq,
    cmp_ne => ne,
    cmp_gt => gt,
    cmp_ge => ge,
    cmp_lt => lt,
    cmp_le => le,
}

impl Bf16x16 {
    /// `self * b + c`, rounded once.
    #[inline(always)]
    pub fn mul_add(self, b: Bf16x16, c: Bf16x16) -> Bf16x16 {
        let [a0, a1, a2, a3] = self.widen().0;
        let [b0, b1, b2, b3] = b.widen().0;
        let [c0, c1, c2, c3] = c.widen().0;
        Bf16x16::from_wide(super::WideF32x16([
            a0.mul_add(b0, c0),
            a1.mul_add(b1, c1),
            a2.mul_add(b2, c2),
            a3.mul_add(b3, c3),
        ]))
    }
}

#[inline(always)]
pub fn fmadd(a: Bf16x16, b: Bf16x16, c: Bf16x16) -> Bf16x16 {
    a.mul_add(b, c)
}
