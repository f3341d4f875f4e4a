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

#![allow(unsafe_code)]

mod emulate;
mod special;

pub mod bfloat16;
pub mod v128;

pub use half::bf16;

/// A fixed-width pack of scalars living in vector registers.
pub trait Vectorized: Copy + Send + Sync + 'static {
    type Scalar: Copy;

    const LANES: usize;

    fn splat(x: Self::Scalar) -> Self;

    /// Reads the first `count` lanes of `src`; the remaining lanes are zero.
    fn load_partial(src: &[Self::Scalar], count: usize) -> Self;

    /// Writes the first `count` lanes to `dst`; the rest of `dst` is untouched.
    fn store_partial(self, dst: &mut [Self::Scalar], count: usize);
}
