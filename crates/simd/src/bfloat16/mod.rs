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

//! Brain float emulated on the 128-bit facility: storage stays 16-bit, every
//! computation happens on widened `f32` lanes.

pub mod convert;
pub mod math;
pub mod ops;
pub mod packed;
pub mod slice;

pub use math::{clamp, clamp_max, clamp_min, maximum, minimum};
pub use ops::fmadd;
pub use packed::{Bf16x16, Mask16x16, WideF32x16};
pub use slice::{
    map_binary, map_unary, vector_add, vector_div, vector_from_f32, vector_mul, vector_mul_add,
    vector_sub, vector_to_f32,
};
