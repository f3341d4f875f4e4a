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

//! NEON registers, little-endian only: `interleave_zero` relies on the low
//! 16-bit lane being the low half of the 32-bit lane. Intrinsic calls sit in
//! `unsafe` blocks since nothing here carries `#[target_feature]`.

use core::arch::aarch64::*;

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct U16x8(uint16x8_t);

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct U32x4(uint32x4_t);

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct F32x4(float32x4_t);

impl U16x8 {
    #[inline(always)]
    pub fn zero() -> Self {
        Self(unsafe { vdupq_n_u16(0) })
    }

    #[inline(always)]
    pub fn splat(x: u16) -> Self {
        Self(unsafe { vdupq_n_u16(x) })
    }

    #[inline(always)]
    pub fn from_array(x: [u16; 8]) -> Self {
        Self(unsafe { vld1q_u16(x.as_ptr()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [u16; 8] {
        let mut r = [0u16; 8];
        unsafe { vst1q_u16(r.as_mut_ptr(), self.0) };
        r
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(unsafe { vandq_u16(self.0, other.0) })
    }

    #[inline(always)]
    pub fn or(self, other: Self) -> Self {
        Self(unsafe { vorrq_u16(self.0, other.0) })
    }

    #[inline(always)]
    pub fn xor(self, other: Self) -> Self {
        Self(unsafe { veorq_u16(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> Self {
        Self(unsafe { vceqq_u16(self.0, other.0) })
    }

    #[inline(always)]
    pub fn select(mask: Self, a: Self, b: Self) -> Self {
        Self(unsafe { vbslq_u16(mask.0, b.0, a.0) })
    }

    #[inline(always)]
    pub fn interleave_zero(self) -> (U32x4, U32x4) {
        unsafe {
            let zero = vdupq_n_u16(0);
            (
                U32x4(vreinterpretq_u32_u16(vzip1q_u16(zero, self.0))),
                U32x4(vreinterpretq_u32_u16(vzip2q_u16(zero, self.0))),
            )
        }
    }

    #[inline(always)]
    pub fn pack_truncate(a: U32x4, b: U32x4) -> Self {
        Self(unsafe { vcombine_u16(vmovn_u32(a.0), vmovn_u32(b.0)) })
    }
}

impl U32x4 {
    #[inline(always)]
    pub fn splat(x: u32) -> Self {
        Self(unsafe { vdupq_n_u32(x) })
    }

    #[inline(always)]
    pub fn from_array(x: [u32; 4]) -> Self {
        Self(unsafe { vld1q_u32(x.as_ptr()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        let mut r = [0u32; 4];
        unsafe { vst1q_u32(r.as_mut_ptr(), self.0) };
        r
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(unsafe { vaddq_u32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(unsafe { vandq_u32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn shr16(self) -> Self {
        Self(unsafe { vshrq_n_u32::<16>(self.0) })
    }

    #[inline(always)]
    pub fn to_f32_bits(self) -> F32x4 {
        F32x4(unsafe { vreinterpretq_f32_u32(self.0) })
    }
}

impl F32x4 {
    #[inline(always)]
    pub fn splat(x: f32) -> Self {
        Self(unsafe { vdupq_n_f32(x) })
    }

    #[inline(always)]
    pub fn from_array(x: [f32; 4]) -> Self {
        Self(unsafe { vld1q_f32(x.as_ptr()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut r = [0.0f32; 4];
        unsafe { vst1q_f32(r.as_mut_ptr(), self.0) };
        r
    }

    #[inline(always)]
    pub fn to_bits(self) -> U32x4 {
        U32x4(unsafe { vreinterpretq_u32_f32(self.0) })
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(unsafe { vaddq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self(unsafe { vsubq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self(unsafe { vmulq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn div(self, other: Self) -> Self {
        Self(unsafe { vdivq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        Self(unsafe { vfmaq_f32(c.0, self.0, b.0) })
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(unsafe { vsqrtq_f32(self.0) })
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> U32x4 {
        U32x4(unsafe { vceqq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_ne(self, other: Self) -> U32x4 {
        U32x4(unsafe { vmvnq_u32(vceqq_f32(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_gt(self, other: Self) -> U32x4 {
        U32x4(unsafe { vcgtq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_ge(self, other: Self) -> U32x4 {
        U32x4(unsafe { vcgeq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_lt(self, other: Self) -> U32x4 {
        U32x4(unsafe { vcltq_f32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_le(self, other: Self) -> U32x4 {
        U32x4(unsafe { vcleq_f32(self.0, other.0) })
    }
}
