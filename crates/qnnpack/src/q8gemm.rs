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

use crate::pack::{blocks_len, split_bias};
use crate::params::{ConvQuantizationParams, DynamicQuantizationParams};
use crate::requantization::{requantize_conv, sub_zero_point};

/// Accumulates `k` reduction elements of up to four rows against one run of
/// 8-byte weight blocks. Sums wrap modulo `2^32`.
#[inline(always)]
pub(crate) fn accumulate(
    acc: &mut [[i32; 4]; 4],
    mr: usize,
    nr: usize,
    k: usize,
    rows: [&[u8]; 4],
    blocks: &[u8],
    input_zero_point: i16,
    kernel_zero_points: &[i32; 4],
) {
    assert!(blocks.len() >= blocks_len(k));
    for m in 0..mr {
        assert!(rows[m].len() >= k);
    }
    for i in 0..k {
        let block = &blocks[(i / 2) * 8..(i / 2) * 8 + 8];
        for m in 0..mr {
            let x = sub_zero_point(rows[m][i], input_zero_point);
            for n in 0..nr {
                let y = block[n * 2 + i % 2] as i32 - kernel_zero_points[n];
                acc[m][n] = acc[m][n].wrapping_add(x.wrapping_mul(y));
            }
        }
    }
}

fn gemm_rows(mr: usize, a: &[u8], a_stride: usize) -> [&[u8]; 4] {
    std::array::from_fn(|m| if m < mr { &a[m * a_stride..] } else { &[][..] })
}

/// Static-quantization GEMM tile:
/// `c[m][n] = requantize(bias[n] + sum_k (a[m][k] - a_zp) * (w[n][k] - w_zp[n]))`.
///
/// Only `mr` rows and `nr` columns of `c` are written.
pub fn q8gemm_4x4c2(
    mr: usize,
    nr: usize,
    k: usize,
    a: &[u8],
    a_stride: usize,
    w: &[u8],
    c: &mut [u8],
    c_stride: usize,
    output_channel_index: usize,
    params: &ConvQuantizationParams,
) {
    assert!((1..=4).contains(&mr) && (1..=4).contains(&nr));
    assert!(c.len() >= (mr - 1) * c_stride + nr);
    let (bias, blocks) = split_bias(w);
    let (kernel_zero_points, scales) = params.channels(output_channel_index, nr);
    let mut acc = [bias; 4];
    accumulate(
        &mut acc,
        mr,
        nr,
        k,
        gemm_rows(mr, a, a_stride),
        blocks,
        params.input_zero_point,
        &kernel_zero_points,
    );
    for m in 0..mr {
        for n in 0..nr {
            c[m * c_stride + n] = requantize_conv(acc[m][n], scales[n], params);
        }
    }
}

/// Dynamic-quantization GEMM tile: `c[m][n] = multipliers[n] * acc[m][n] + b[n]`.
///
/// The integer bias header of `w` is skipped; the bias comes from `b`.
pub fn q8gemm_dq_4x4c2(
    mr: usize,
    nr: usize,
    k: usize,
    a: &[u8],
    a_stride: usize,
    w: &[u8],
    b: &[f32],
    c: &mut [f32],
    c_stride: usize,
    output_channel_index: usize,
    params: &DynamicQuantizationParams,
) {
    assert!((1..=4).contains(&mr) && (1..=4).contains(&nr));
    assert!(b.len() >= nr);
    assert!(c.len() >= (mr - 1) * c_stride + nr);
    let (_, blocks) = split_bias(w);
    let (kernel_zero_points, multipliers) = params.channels(output_channel_index, nr);
    let mut acc = [[0; 4]; 4];
    accumulate(
        &mut acc,
        mr,
        nr,
        k,
        gemm_rows(mr, a, a_stride),
        blocks,
        params.input_zero_point,
        &kernel_zero_points,
    );
    for m in 0..mr {
        for n in 0..nr {
            c[m * c_stride + n] = multipliers[n] * acc[m][n] as f32 + b[n];
        }
    }
}
