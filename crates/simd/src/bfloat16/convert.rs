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

//! Conversion between bf16 bit patterns and `f32` lanes.
//!
//! A bf16 is the upper half of an `f32`, so widening only moves bits. Narrowing
//! rounds to nearest, ties to even, by adding `0x7fff` plus the lowest kept bit
//! before dropping the lower half.

use crate::v128::{F32x4, U16x8, U32x4};

/// Lanes `0..4` go to the first result, lanes `4..8` to the second.
#[inline(always)]
pub fn widen(x: U16x8) -> (F32x4, F32x4) {
    let (a, b) = x.interleave_zero();
    (a.to_f32_bits(), b.to_f32_bits())
}

#[inline(always)]
fn round_upper_half(x: U32x4) -> U32x4 {
    let lsb = x.shr16().and(U32x4::splat(1));
    x.add(U32x4::splat(0x7fff)).add(lsb).shr16()
}

/// Rounding narrow. `a` fills lanes `0..4`, `b` fills lanes `4..8`.
#[inline(always)]
pub fn narrow(a: F32x4, b: F32x4) -> U16x8 {
    U16x8::pack_truncate(round_upper_half(a.to_bits()), round_upper_half(b.to_bits()))
}

/// Drops the lower half of every lane. Meant for comparison masks.
#[inline(always)]
pub fn narrow_truncating(a: F32x4, b: F32x4) -> U16x8 {
    U16x8::pack_truncate(a.to_bits().shr16(), b.to_bits().shr16())
}

#[inline(always)]
pub fn bf16_to_f32_bits(x: u16) -> u32 {
    (x as u32) << 16
}

#[inline(always)]
pub fn f32_to_bf16_bits_round(x: u32) -> u16 {
    let lsb = (x >> 16) & 1;
    (x.wrapping_add(0x7fff).wrapping_add(lsb) >> 16) as u16
}

#[inline(always)]
pub fn f32_to_bf16_bits_truncate(x: u32) -> u16 {
    (x >> 16) as u16
}
