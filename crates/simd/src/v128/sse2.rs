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

//! SSE2 registers. SSE2 is part of the x86_64 baseline, so nothing here needs
//! runtime detection. `mul_add` uses FMA only when it is enabled at compile time.
//!
//! Intrinsics are called from plain functions, so every call sits in an
//! `unsafe` block; the features they need are enabled for the whole build.

use core::arch::x86_64::*;

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct U16x8(__m128i);

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct U32x4(__m128i);

#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl U16x8 {
    #[inline(always)]
    pub fn zero() -> Self {
        Self(unsafe { _mm_setzero_si128() })
    }

    #[inline(always)]
    pub fn splat(x: u16) -> Self {
        Self(unsafe { _mm_set1_epi16(x as i16) })
    }

    #[inline(always)]
    pub fn from_array(x: [u16; 8]) -> Self {
        Self(unsafe { _mm_loadu_si128(x.as_ptr().cast()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [u16; 8] {
        let mut r = [0u16; 8];
        unsafe { _mm_storeu_si128(r.as_mut_ptr().cast(), self.0) };
        r
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, other.0) })
    }

    #[inline(always)]
    pub fn or(self, other: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, other.0) })
    }

    #[inline(always)]
    pub fn xor(self, other: Self) -> Self {
        Self(unsafe { _mm_xor_si128(self.0, other.0) })
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> Self {
        Self(unsafe { _mm_cmpeq_epi16(self.0, other.0) })
    }

    #[inline(always)]
    pub fn select(mask: Self, a: Self, b: Self) -> Self {
        unsafe {
            Self(_mm_or_si128(
                _mm_and_si128(mask.0, b.0),
                _mm_andnot_si128(mask.0, a.0),
            ))
        }
    }

    #[inline(always)]
    pub fn interleave_zero(self) -> (U32x4, U32x4) {
        unsafe {
            let zero = _mm_setzero_si128();
            (
                U32x4(_mm_unpacklo_epi16(zero, self.0)),
                U32x4(_mm_unpackhi_epi16(zero, self.0)),
            )
        }
    }

    #[inline(always)]
    pub fn pack_truncate(a: U32x4, b: U32x4) -> Self {
        // `packs` saturates, so sign-extend the low halves first; the pack is then exact.
        unsafe {
            let a = _mm_srai_epi32::<16>(_mm_slli_epi32::<16>(a.0));
            let b = _mm_srai_epi32::<16>(_mm_slli_epi32::<16>(b.0));
            Self(_mm_packs_epi32(a, b))
        }
    }
}

impl U32x4 {
    #[inline(always)]
    pub fn splat(x: u32) -> Self {
        Self(unsafe { _mm_set1_epi32(x as i32) })
    }

    #[inline(always)]
    pub fn from_array(x: [u32; 4]) -> Self {
        Self(unsafe { _mm_loadu_si128(x.as_ptr().cast()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        let mut r = [0u32; 4];
        unsafe { _mm_storeu_si128(r.as_mut_ptr().cast(), self.0) };
        r
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(unsafe { _mm_add_epi32(self.0, other.0) })
    }

    #[inline(always)]
    pub fn and(self, other: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, other.0) })
    }

    #[inline(always)]
    pub fn shr16(self) -> Self {
        Self(unsafe { _mm_srli_epi32::<16>(self.0) })
    }

    #[inline(always)]
    pub fn to_f32_bits(self) -> F32x4 {
        F32x4(unsafe { _mm_castsi128_ps(self.0) })
    }
}

impl F32x4 {
    #[inline(always)]
    pub fn splat(x: f32) -> Self {
        Self(unsafe { _mm_set1_ps(x) })
    }

    #[inline(always)]
    pub fn from_array(x: [f32; 4]) -> Self {
        Self(unsafe { _mm_loadu_ps(x.as_ptr()) })
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut r = [0.0f32; 4];
        unsafe { _mm_storeu_ps(r.as_mut_ptr(), self.0) };
        r
    }

    #[inline(always)]
    pub fn to_bits(self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(self.0) })
    }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self(unsafe { _mm_add_ps(self.0, other.0) })
    }

    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self(unsafe { _mm_sub_ps(self.0, other.0) })
    }

    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self(unsafe { _mm_mul_ps(self.0, other.0) })
    }

    #[inline(always)]
    pub fn div(self, other: Self) -> Self {
        Self(unsafe { _mm_div_ps(self.0, other.0) })
    }

    #[inline(always)]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        #[cfg(target_feature = "fma")]
        {
            Self(unsafe { _mm_fmadd_ps(self.0, b.0, c.0) })
        }
        #[cfg(not(target_feature = "fma"))]
        {
            let (x, y, z) = (self.to_array(), b.to_array(), c.to_array());
            Self::from_array(std::array::from_fn(|i| x[i].mul_add(y[i], z[i])))
        }
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(unsafe { _mm_sqrt_ps(self.0) })
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmpeq_ps(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_ne(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmpneq_ps(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_gt(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmpgt_ps(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_ge(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmpge_ps(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_lt(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmplt_ps(self.0, other.0)) })
    }

    #[inline(always)]
    pub fn cmp_le(self, other: Self) -> U32x4 {
        U32x4(unsafe { _mm_castps_si128(_mm_cmple_ps(self.0, other.0)) })
    }
}
