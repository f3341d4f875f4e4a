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

use crate::params::AvgPoolQuantizationParams;
use crate::requantization::requantize_avgpool;

/// Global average pooling of `m` rows with fewer than 16 channels.
///
/// Row `r` starts at `input[r * input_stride]`. `output[c]` is the
/// requantized sum of column `c` plus the bias.
pub fn q8gavgpool_up16xm(
    m: usize,
    n: usize,
    input: &[u8],
    input_stride: usize,
    output: &mut [u8],
    params: &AvgPoolQuantizationParams,
) {
    debug_assert!(m >= 1);
    debug_assert!(n < 16);
    assert!(input.len() >= (m - 1) * input_stride + n);
    assert!(output.len() >= n);
    let mut acc = [params.bias; 16];
    for r in 0..m {
        let row = &input[r * input_stride..][..n];
        for c in 0..n {
            acc[c] = acc[c].wrapping_add(row[c] as i32);
        }
    }
    for c in 0..n {
        output[c] = requantize_avgpool(acc[c], params);
    }
}
