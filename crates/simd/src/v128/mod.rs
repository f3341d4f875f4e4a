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

//! The 128-bit vector facility: eight 16-bit lanes, four 32-bit lanes, four
//! `f32` lanes. The backend is fixed at compile time by `target_arch`.

#[cfg_attr(
    any(
        target_arch = "x86_64",
        all(target_arch = "aarch64", target_endian = "little")
    ),
    allow(dead_code)
)]
mod portable;

#[cfg(target_arch = "x86_64")]
mod sse2;

#[cfg(all(target_arch = "aarch64", target_endian = "little"))]
mod neon;

#[cfg(target_arch = "x86_64")]
pub use sse2::{F32x4, U16x8, U32x4};

#[cfg(all(target_arch = "aarch64", target_endian = "little"))]
pub use neon::{F32x4, U16x8, U32x4};

#[cfg(not(any(
    target_arch = "x86_64",
    all(target_arch = "aarch64", target_endian = "little")
)))]
pub use portable::{F32x4, U16x8, U32x4};
