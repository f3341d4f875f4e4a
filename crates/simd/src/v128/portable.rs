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

//! Array-backed registers. Used on targets without a native backend and as the
//! reference the native backends are tested against.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U16x8([u16; 8]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U32x4([u32; 4]);

#[derive(Debug, Clone, Copy)]
pub struct F32x4([f32; 4]);

#[inline(always)]
fn mask32(b: bool) -> u32 {
    (b as u32).wrapping_neg()
}

impl U16x8 {
    #[inline(always)]
    pub fn zero() -> Self {
        Self([0; 8])
    }

    #[inline(always)]
    pub fn splat(x: u16) -> Self {
        Self([x; 8])
    }

    #[inline(always)]
    pub fn from_array(x: [u16; 8]) -> Self {
        Self(x)
    }

    #[inline(always)]
    pub fn to_array(self) -> [u16; 8] {
        self.0
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] & other.0[i]))
    }

    #[inline(always)]
    pub fn or(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] | other.0[i]))
    }

    #[inline(always)]
    pub fn xor(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] ^ other.0[i]))
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| {
            ((self.0[i] == other.0[i]) as u16).wrapping_neg()
        }))
    }

    /// Bitwise select: bits of `b` where `mask` is set, bits of `a` elsewhere.
    #[inline(always)]
    pub fn select(mask: Self, a: Self, b: Self) -> Self {
        Self(std::array::from_fn(|i| {
            (mask.0[i] & b.0[i]) | (!mask.0[i] & a.0[i])
        }))
    }

    /// Places every 16-bit lane in the upper half of a 32-bit lane whose lower
    /// half is zero. Lanes `0..4` go to the first result, `4..8` to the second.
    #[inline(always)]
    pub fn interleave_zero(self) -> (U32x4, U32x4) {
        let x = self.0;
        (
            U32x4(std::array::from_fn(|i| (x[i] as u32) << 16)),
            U32x4(std::array::from_fn(|i| (x[4 + i] as u32) << 16)),
        )
    }

    /// Keeps the low 16 bits of every 32-bit lane, `a` in lanes `0..4`, `b` in `4..8`.
    #[inline(always)]
    pub fn pack_truncate(a: U32x4, b: U32x4) -> Self {
        Self(std::array::from_fn(|i| {
            if i < 4 { a.0[i] as u16 } else { b.0[i - 4] as u16 }
        }))
    }
}

impl U32x4 {
    #[inline(always)]
    pub fn splat(x: u32) -> Self {
        Self([x; 4])
    }

    #[inline(always)]
    pub fn from_array(x: [u32; 4]) -> Self {
        Self(x)
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        self.0
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].wrapping_add(other.0[i])))
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] & other.0[i]))
    }

    #[inline(always)]
    pub fn shr16(self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] >> 16))
    }

    #[inline(always)]
    pub fn to_f32_bits(self) -> F32x4 {
        F32x4(self.0.map(f32::from_bits))
    }
}

impl F32x4 {
    #[inline(always)]
    pub fn splat(x: f32) -> Self {
        Self([x; 4])
    }

    #[inline(always)]
    pub fn from_array(x: [f32; 4]) -> Self {
        Self(x)
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        self.0
    }

    #[inline(always)]
    pub fn to_bits(self) -> U32x4 {
        U32x4(self.0.map(f32::to_bits))
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + other.0[i]))
    }

    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - other.0[i]))
    }

    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] * other.0[i]))
    }

    #[inline(always)]
    pub fn div(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] / other.0[i]))
    }

    /// `self * b + c` with a single rounding.
    #[inline(always)]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].mul_add(b.0[i], c.0[i])))
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(self.0.map(f32::sqrt))
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] == other.0[i])))
    }

    /// Unordered lanes compare not-equal.
    #[inline(always)]
    pub fn cmp_ne(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] != other.0[i])))
    }

    #[inline(always)]
    pub fn cmp_gt(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] > other.0[i])))
    }

    #[inline(always)]
    pub fn cmp_ge(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] >= other.0[i])))
    }

    #[inline(always)]
    pub fn cmp_lt(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] < other.0[i])))
    }

    #[inline(always)]
    pub fn cmp_le(self, other: Self) -> U32x4 {
        U32x4(std::array::from_fn(|i| mask32(self.0[i] <= other.0[i])))
    }
}
