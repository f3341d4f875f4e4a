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

use super::convert;
use crate::v128::{F32x4, U16x8, U32x4};
use crate::{Vectorized, bf16, emulate};
use seq_macro::seq;

/// Sixteen bf16 lanes held in two 128-bit registers, lanes `0..8` in the first.
#[derive(Debug, Clone, Copy)]
pub struct Bf16x16([U16x8; 2]);

/// Per-lane booleans for [`Bf16x16::blendv`]. Every lane is `0xffff` or `0x0000`.
#[derive(Debug, Clone, Copy)]
pub struct Mask16x16([U16x8; 2]);

/// A widened [`Bf16x16`]: four groups of four `f32` lanes, in lane order.
#[derive(Debug, Clone, Copy)]
pub struct WideF32x16(pub [F32x4; 4]);

#[inline(always)]
fn half_mask(bits: u8) -> U16x8 {
    U16x8::from_array(seq!(N in 0..8 {
        [#(if (bits >> N) & 1 != 0 { 0xffff } else { 0 },)*]
    }))
}

#[inline(always)]
fn half_bitmask(x: U16x8) -> u8 {
    let x = x.to_array();
    let mut r = 0u8;
    seq!(N in 0..8 {
        r |= ((x[N] >> 15) as u8) << N;
    });
    r
}

/// One 8-lane half of [`Bf16x16::blend`]. Three outcomes per half, nine per vector.
#[inline(always)]
fn blend_half(a: U16x8, b: U16x8, bits: u8) -> U16x8 {
    match bits {
        0x00 => a,
        0xff => b,
        _ => U16x8::select(half_mask(bits), a, b),
    }
}

impl Mask16x16 {
    /// Canonicalizes raw lanes: `0xffff` stays set, any other pattern becomes clear.
    #[inline(always)]
    pub fn from_lanes(x: Bf16x16) -> Self {
        let ones = U16x8::splat(0xffff);
        Self(x.0.map(|h| h.cmp_eq(ones)))
    }

    #[inline(always)]
    pub fn to_lanes(self) -> Bf16x16 {
        Bf16x16(self.0)
    }

    /// Bit `i` set means lane `i` is set.
    #[inline(always)]
    pub fn from_bitmask(bits: u16) -> Self {
        Self([half_mask(bits as u8), half_mask((bits >> 8) as u8)])
    }

    #[inline(always)]
    pub fn to_bitmask(self) -> u16 {
        let [lo, hi] = self.0;
        half_bitmask(lo) as u16 | (half_bitmask(hi) as u16) << 8
    }

    pub fn from_bools(x: [bool; 16]) -> Self {
        let mut bits = 0u16;
        for (i, b) in x.into_iter().enumerate() {
            bits |= (b as u16) << i;
        }
        Self::from_bitmask(bits)
    }
}

impl WideF32x16 {
    #[inline(always)]
    pub fn from_array(x: [f32; 16]) -> Self {
        let x: [[f32; 4]; 4] = zerocopy::transmute!(x);
        Self(x.map(F32x4::from_array))
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 16] {
        zerocopy::transmute!(self.0.map(F32x4::to_array))
    }

    #[inline(always)]
    pub fn map(self, f: impl Fn(F32x4) -> F32x4) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    pub fn zip(self, other: Self, f: impl Fn(F32x4, F32x4) -> F32x4) -> Self {
        let (a, b) = (self.0, other.0);
        Self([f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])])
    }

    #[inline(always)]
    pub fn zip_mask(self, other: Self, f: impl Fn(F32x4, F32x4) -> U32x4) -> Self {
        self.zip(other, |a, b| f(a, b).to_f32_bits())
    }

    /// Applies `f` to every scalar lane.
    #[inline(always)]
    pub fn map_lanes(self, f: impl Fn(f32) -> f32) -> Self {
        self.map(|x| F32x4::from_array(x.to_array().map(&f)))
    }

    #[inline(always)]
    pub fn zip_lanes(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        self.zip(other, |a, b| {
            let (a, b) = (a.to_array(), b.to_array());
            F32x4::from_array(std::array::from_fn(|i| f(a[i], b[i])))
        })
    }
}

impl Bf16x16 {
    pub const LANES: usize = 16;

    #[inline(always)]
    pub fn from_halves(lo: U16x8, hi: U16x8) -> Self {
        Self([lo, hi])
    }

    #[inline(always)]
    pub fn halves(self) -> [U16x8; 2] {
        self.0
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self([U16x8::zero(); 2])
    }

    #[inline(always)]
    pub fn splat(x: bf16) -> Self {
        Self([U16x8::splat(x.to_bits()); 2])
    }

    #[inline(always)]
    pub fn splat_bits(x: u16) -> Self {
        Self([U16x8::splat(x); 2])
    }

    #[inline(always)]
    pub fn from_bits(x: [u16; 16]) -> Self {
        let [lo, hi]: [[u16; 8]; 2] = zerocopy::transmute!(x);
        Self([U16x8::from_array(lo), U16x8::from_array(hi)])
    }

    #[inline(always)]
    pub fn to_bits(self) -> [u16; 16] {
        zerocopy::transmute!(self.0.map(U16x8::to_array))
    }

    #[inline(always)]
    pub fn from_array(x: [bf16; 16]) -> Self {
        Self::from_bits(zerocopy::transmute!(x))
    }

    #[inline(always)]
    pub fn to_array(self) -> [bf16; 16] {
        zerocopy::transmute!(self.to_bits())
    }

    /// Little-endian in memory, lane `0` first.
    #[inline(always)]
    pub fn from_bytes(x: &[u8; 32]) -> Self {
        let bits: [u16; 16] = zerocopy::transmute!(*x);
        Self::from_bits(bits.map(u16::from_le))
    }

    #[inline(always)]
    pub fn to_bytes(self) -> [u8; 32] {
        zerocopy::transmute!(self.to_bits().map(u16::to_le))
    }

    #[inline(always)]
    pub fn load(src: &[bf16; 16]) -> Self {
        Self::from_array(*src)
    }

    /// Loads the first `count` lanes, zeroing the rest. `count` must not exceed 16.
    #[inline(always)]
    pub fn load_partial(src: &[bf16], count: usize) -> Self {
        debug_assert!(count <= Self::LANES);
        Self::from_array(emulate::partial_load(src, count))
    }

    #[inline(always)]
    pub fn store(self, dst: &mut [bf16; 16]) {
        *dst = self.to_array();
    }

    /// Stores the first `count` lanes; the rest of `dst` keeps its content.
    #[inline(always)]
    pub fn store_partial(self, dst: &mut [bf16], count: usize) {
        debug_assert!(count <= Self::LANES);
        emulate::partial_store(&self.to_array(), dst, count);
    }

    #[inline(always)]
    pub fn widen(self) -> WideF32x16 {
        let [lo, hi] = self.0;
        let (a, b) = convert::widen(lo);
        let (c, d) = convert::widen(hi);
        WideF32x16([a, b, c, d])
    }

    #[inline(always)]
    pub fn from_wide(x: WideF32x16) -> Self {
        let [a, b, c, d] = x.0;
        Self([convert::narrow(a, b), convert::narrow(c, d)])
    }

    #[inline(always)]
    pub fn from_wide_truncating(x: WideF32x16) -> Self {
        let [a, b, c, d] = x.0;
        Self([
            convert::narrow_truncating(a, b),
            convert::narrow_truncating(c, d),
        ])
    }

    /// Lanes of `b` where `mask` is set, lanes of `a` elsewhere.
    #[inline(always)]
    pub fn blendv(a: Self, b: Self, mask: Mask16x16) -> Self {
        Self([
            U16x8::select(mask.0[0], a.0[0], b.0[0]),
            U16x8::select(mask.0[1], a.0[1], b.0[1]),
        ])
    }

    /// Bit `i` of `bitmask` selects lane `i` from `b`.
    #[inline(always)]
    pub fn blend(a: Self, b: Self, bitmask: u16) -> Self {
        Self([
            blend_half(a.0[0], b.0[0], bitmask as u8),
            blend_half(a.0[1], b.0[1], (bitmask >> 8) as u8),
        ])
    }

    /// The first `count` lanes from `b`, the rest from `a`.
    #[inline(always)]
    pub fn set(a: Self, b: Self, count: usize) -> Self {
        if count >= Self::LANES {
            return b;
        }
        Self::blend(a, b, (1u16 << count) - 1)
    }

    /// Lane `i` is `base + i * step`, rounded once from `f32`.
    pub fn arange(base: bf16, step: f32) -> Self {
        let base = base.to_f32();
        Self::from_bits(seq!(N in 0..16 {
            [#(convert::f32_to_bf16_bits_round((base + N as f32 * step).to_bits()),)*]
        }))
    }
}

impl Vectorized for Bf16x16 {
    type Scalar = bf16;

    const LANES: usize = 16;

    #[inline(always)]
    fn splat(x: bf16) -> Self {
        Bf16x16::splat(x)
    }

    #[inline(always)]
    fn load_partial(src: &[bf16], count: usize) -> Self {
        Bf16x16::load_partial(src, count)
    }

    #[inline(always)]
    fn store_partial(self, dst: &mut [bf16], count: usize) {
        Bf16x16::store_partial(self, dst, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_bf16x16(rng: &mut impl Rng) -> Bf16x16 {
        Bf16x16::from_bits(rng.random())
    }

    #[test]
    fn load_store_partial() {
        let src: [bf16; 16] = std::array::from_fn(|i| bf16::from_f32(i as f32 + 1.0));
        for count in 0..=16 {
            let x = Bf16x16::load_partial(&src[..count], count);
            let lanes = x.to_array();
            for i in 0..16 {
                let expected = if i < count { src[i] } else { bf16::ZERO };
                assert_eq!(lanes[i].to_bits(), expected.to_bits());
            }
            let mut dst = [bf16::from_f32(-7.0); 16];
            x.store_partial(&mut dst, count);
            for i in 0..16 {
                let expected = if i < count { src[i] } else { bf16::from_f32(-7.0) };
                assert_eq!(dst[i].to_bits(), expected.to_bits());
            }
        }
    }

    #[test]
    fn load_partial_five_leaves_rest() {
        let src: [bf16; 16] = std::array::from_fn(|i| bf16::from_f32(i as f32 * 0.5));
        let x = Bf16x16::load_partial(&src, 5);
        let mut dst = [bf16::from_f32(3.0); 16];
        x.store_partial(&mut dst, 5);
        assert_eq!(&dst[..5], &src[..5]);
        assert!(dst[5..].iter().all(|&v| v == bf16::from_f32(3.0)));
    }

    #[test]
    fn full_load_store() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 256 } else { 1 } {
            let bits: [u16; 16] = rng.random();
            let x = Bf16x16::from_bits(bits);
            let mut dst = [bf16::ZERO; 16];
            Bf16x16::load(&x.to_array()).store(&mut dst);
            assert_eq!(dst.map(bf16::to_bits), bits);
            assert_eq!(Bf16x16::from_bytes(&x.to_bytes()).to_bits(), bits);
            assert_eq!(x.to_bytes()[0..2], bits[0].to_le_bytes());
        }
    }

    #[test]
    fn blend_matches_blendv() {
        let mut rng = rand::rng();
        // every class per half: all from a, all from b, mixed
        let patterns = [0x0000u16, 0x00ff, 0xff00, 0xffff, 0x0f00, 0x00f0, 0xff0f, 0x0fff, 0x1234];
        for _ in 0..if cfg!(not(miri)) { 256 } else { 1 } {
            let a = random_bf16x16(&mut rng);
            let b = random_bf16x16(&mut rng);
            let random: u16 = rng.random();
            for bitmask in patterns.into_iter().chain([random]) {
                let specialized = Bf16x16::blend(a, b, bitmask).to_bits();
                let fallback =
                    Bf16x16::blendv(a, b, Mask16x16::from_bitmask(bitmask)).to_bits();
                assert!(
                    specialized == fallback,
                    "specialized = {specialized:?}, fallback = {fallback:?}."
                );
                let (a, b) = (a.to_bits(), b.to_bits());
                let expected: [u16; 16] =
                    std::array::from_fn(|i| if (bitmask >> i) & 1 != 0 { b[i] } else { a[i] });
                assert_eq!(specialized, expected);
            }
        }
    }

    #[test]
    fn mask_canonicalizes() {
        let raw = Bf16x16::from_bits(std::array::from_fn(|i| match i % 4 {
            0 => 0xffff,
            1 => 0x0000,
            2 => 0x8000,
            _ => 0xfffe,
        }));
        let mask = Mask16x16::from_lanes(raw);
        assert_eq!(mask.to_bitmask(), 0x1111);
        let expected: [u16; 16] = std::array::from_fn(|i| if i % 4 == 0 { 0xffff } else { 0 });
        assert_eq!(mask.to_lanes().to_bits(), expected);
        let bools: [bool; 16] = std::array::from_fn(|i| i % 3 == 0);
        assert_eq!(Mask16x16::from_bools(bools).to_bitmask(), 0b1001_0010_0100_1001);
    }

    #[test]
    fn set_takes_prefix() {
        let a = Bf16x16::splat(bf16::from_f32(1.0));
        let b = Bf16x16::splat(bf16::from_f32(2.0));
        for count in 0..=20 {
            let x = Bf16x16::set(a, b, count).to_array();
            for (i, v) in x.into_iter().enumerate() {
                let expected = if i < count { 2.0 } else { 1.0 };
                assert_eq!(v.to_f32(), expected);
            }
        }
    }

    #[test]
    fn arange_lanes() {
        let x = Bf16x16::arange(bf16::from_f32(1.0), 0.5).to_array();
        for (i, v) in x.into_iter().enumerate() {
            assert_eq!(v, bf16::from_f32(1.0 + i as f32 * 0.5));
        }
        let x = Bf16x16::arange(bf16::ZERO, 1.0).to_array();
        assert_eq!(x[15].to_f32(), 15.0);
    }

    #[test]
    fn wide_round_trip() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 256 } else { 1 } {
            let x = random_bf16x16(&mut rng);
            assert_eq!(Bf16x16::from_wide(x.widen()).to_bits(), x.to_bits());
            let wide = x.widen().to_array();
            let bits = x.to_bits();
            for i in 0..16 {
                assert_eq!(wide[i].to_bits(), (bits[i] as u32) << 16);
            }
        }
    }

    #[test]
    fn vectorized_lanes() {
        assert_eq!(<Bf16x16 as Vectorized>::LANES, Bf16x16::LANES);
        let x = <Bf16x16 as Vectorized>::splat(bf16::ONE);
        assert_eq!(x.to_array(), [bf16::ONE; 16]);
    }
}
