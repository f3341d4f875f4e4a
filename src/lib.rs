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

//! Quantized tensor kernels: emulated bf16 vectors and 8-bit GEMM,
//! convolution and pooling tiles, configured from TOML.

pub mod error;
pub mod types;

pub use error::Error;
pub use qnnpack;
pub use simd;
pub use types::{
    AvgPoolQuantizationOptions, ConvQuantizationOptions, DynamicQuantizationOptions, parse_options,
};
