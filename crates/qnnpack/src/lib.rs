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

//! Quantized 8-bit micro-kernels: GEMM, dynamic-quantization GEMM, indirect
//! convolution and average pooling over `u8` activations.

pub mod pack;
pub mod params;
pub mod q8avgpool;
pub mod q8conv;
pub mod q8gavgpool;
pub mod q8gemm;
pub mod requantization;

pub use params::{AvgPoolQuantizationParams, ConvQuantizationParams, DynamicQuantizationParams};

/// Rows of output produced by one 4x4c2 tile.
pub const MR: usize = 4;
/// Columns of output produced by one 4x4c2 tile.
pub const NR: usize = 4;
/// Reduction elements interleaved per weight block.
pub const KR: usize = 2;
