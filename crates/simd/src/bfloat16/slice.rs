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

use super::packed::{Bf16x16, WideF32x16};
use crate::{bf16, emulate};

impl Bf16x16 {
    #[inline(always)]
    pub fn to_f32x16(self) -> [f32; 16] {
        self.widen().to_array()
    }

    #[inline(always)]
    pub fn from_f32x16(x: &[f32; 16]) -> Self {
        Bf16x16::from_wide(WideF32x16::from_array(*x))
    }
}

pub fn vector_from_f32(this: &[f32]) -> Vec<bf16> {
    let n = this.len();
    let mut r = vec![bf16::ZERO; n];
    let mut i = 0;
    while i < n {
        let count = (n - i).min(16);
        let x: [f32; 16] = emulate::partial_load(&this[i..], count);
        Bf16x16::from_f32x16(&x).store_partial(&mut r[i..], count);
        i += count;
    }
    r
}

pub fn vector_to_f32(this: &[bf16]) -> Vec<f32> {
    let n = this.len();
    let mut r = vec![0.0f32; n];
    let mut i = 0;
    while i < n {
        let count = (n - i).min(16);
        let x = Bf16x16::load_partial(&this[i..], count).to_f32x16();
        emulate::partial_store(&x, &mut r[i..], count);
        i += count;
    }
    r
}

/// Applies `f` sixteen lanes at a time; the tail goes through partial loads and stores.
pub fn map_unary(src: &[bf16], dst: &mut [bf16], f: impl Fn(Bf16x16) -> Bf16x16) {
    assert_eq!(src.len(), dst.len());
    let n = src.len();
    let mut i = 0;
    while i < n {
        let count = (n - i).min(16);
        let x = Bf16x16::load_partial(&src[i..], count);
        f(x).store_partial(&mut dst[i..], count);
        i += count;
    }
}

pub fn map_binary(
    lhs: &[bf16],
    rhs: &[bf16],
    dst: &mut [bf16],
    f: impl Fn(Bf16x16, Bf16x16) -> Bf16x16,
) {
    assert_eq!(lhs.len(), rhs.len());
    assert_eq!(lhs.len(), dst.len());
    let n = lhs.len();
    let mut i = 0;
    while i < n {
        let count = (n - i).min(16);
        let x = Bf16x16::load_partial(&lhs[i..], count);
        let y = Bf16x16::load_partial(&rhs[i..], count);
        f(x, y).store_partial(&mut dst[i..], count);
        i += count;
    }
}

pub fn vector_add(lhs: &[bf16], rhs: &[bf16], out: &mut [bf16]) {
    map_binary(lhs, rhs, out, |x, y| x + y)
}

pub fn vector_sub(lhs: &[bf16], rhs: &[bf16], out: &mut [bf16]) {
    map_binary(lhs, rhs, out, |x, y| x - y)
}

pub fn vector_mul(lhs: &[bf16], rhs: &[bf16], out: &mut [bf16]) {
    map_binary(lhs, rhs, out, |x, y| x * y)
}

pub fn vector_div(lhs: &[bf16], rhs: &[bf16], out: &mut [bf16]) {
    map_binary(lhs, rhs, out, |x, y| x / y)
}

/// `out = a * b + c` with one rounding per lane.
pub fn vector_mul_add(a: &[bf16], b: &[bf16], c: &[bf16], out: &mut [bf16]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), c.len());
    assert_eq!(a.len(), out.len());
    let n = a.len();
    let mut i = 0;
    while i < n {
        let count = (n - i).min(16);
        let x = Bf16x16::load_partial(&a[i..], count);
        let y = Bf16x16::load_partial(&b[i..], count);
        let z = Bf16x16::load_partial(&c[i..], count);
        x.mul_add(y, z).store_partial(&mut out[i..], count);
        i += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_vector(rng: &mut impl Rng, n: usize) -> Vec<bf16> {
        (0..n)
            .map(|_| bf16::from_f32(rng.random_range(-1.0f32..1.0)))
            .collect()
    }

    #[test]
    fn conversions_match_half() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 64 } else { 1 } {
            let n = rng.random_range(0..100);
            let x = (0..n)
                .map(|_| rng.random_range(-1000.0f32..1000.0))
                .collect::<Vec<_>>();
            let specialized = vector_from_f32(&x);
            let fallback = x.iter().copied().map(bf16::from_f32).collect::<Vec<_>>();
            assert!(
                specialized == fallback,
                "specialized = {specialized:?}, fallback = {fallback:?}."
            );
            let specialized = vector_to_f32(&fallback);
            let fallback = fallback.iter().copied().map(bf16::to_f32).collect::<Vec<_>>();
            assert!(
                specialized == fallback,
                "specialized = {specialized:?}, fallback = {fallback:?}."
            );
        }
    }

    #[test]
    fn vector_ops_match_chunks() {
        let mut rng = rand::rng();
        for n in [0usize, 1, 15, 16, 17, 31, 32, 33, 100] {
            let a = random_vector(&mut rng, n);
            let b = random_vector(&mut rng, n);
            let c = random_vector(&mut rng, n);
            let mut out = vec![bf16::ZERO; n];
            vector_add(&a, &b, &mut out);
            let fallback = (0..n)
                .map(|i| bf16::from_f32(a[i].to_f32() + b[i].to_f32()))
                .collect::<Vec<_>>();
            assert_eq!(out, fallback);
            vector_sub(&a, &b, &mut out);
            let fallback = (0..n)
                .map(|i| bf16::from_f32(a[i].to_f32() - b[i].to_f32()))
                .collect::<Vec<_>>();
            assert_eq!(out, fallback);
            vector_mul(&a, &b, &mut out);
            let fallback = (0..n)
                .map(|i| bf16::from_f32(a[i].to_f32() * b[i].to_f32()))
                .collect::<Vec<_>>();
            assert_eq!(out, fallback);
            // keep divisors away from zero
            let d = b.iter().map(|v| bf16::from_f32(v.to_f32().abs() + 1.0)).collect::<Vec<_>>();
            vector_div(&a, &d, &mut out);
            let fallback = (0..n)
                .map(|i| bf16::from_f32(a[i].to_f32() / d[i].to_f32()))
                .collect::<Vec<_>>();
            assert_eq!(out, fallback);
            vector_mul_add(&a, &b, &c, &mut out);
            let fallback = (0..n)
                .map(|i| bf16::from_f32(a[i].to_f32().mul_add(b[i].to_f32(), c[i].to_f32())))
                .collect::<Vec<_>>();
            assert_eq!(out, fallback);
        }
    }

    #[test]
    fn map_unary_leaves_nothing_behind() {
        let src = (0..37).map(|i| bf16::from_f32(i as f32)).collect::<Vec<_>>();
        let mut dst = vec![bf16::from_f32(-1.0); 37];
        map_unary(&src, &mut dst, |x| x.sqrt());
        for i in 0..37 {
            assert_eq!(dst[i], bf16::from_f32((i as f32).sqrt()));
        }
    }
}
