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
use crate::params::ConvQuantizationParams;
use crate::q8gemm::accumulate;
use crate::requantization::requantize_conv;

/// Indirect convolution tile.
///
/// `a` is the indirection buffer: for kernel position `s`, `a[4 * s + m]` is
/// the input row feeding output row `m`, of which `kc` channels are read.
/// Entries for rows `m >= mr` are never dereferenced.
pub fn q8conv_4x4c2(
    mr: usize,
    nr: usize,
    kc: usize,
    ks: usize,
    a: &[&[u8]],
    w: &[u8],
    c: &mut [u8],
    c_stride: usize,
    output_channel_index: usize,
    params: &ConvQuantizationParams,
) {
    assert!((1..=4).contains(&mr) && (1..=4).contains(&nr));
    assert!(a.len() >= ks * 4);
    assert!(c.len() >= (mr - 1) * c_stride + nr);
    let (bias, blocks) = split_bias(w);
    assert!(blocks.len() >= ks * blocks_len(kc));
    let (kernel_zero_points, scales) = params.channels(output_channel_index, nr);
    let mut acc = [bias; 4];
    for s in 0..ks {
        let rows = std::array::from_fn(|m| if m < mr { a[4 * s + m] } else { &[][..] });
        accumulate(
            &mut acc,
            mr,
            nr,
            kc,
            rows,
            &blocks[s * blocks_len(kc)..],
            params.input_zero_point,
            &kernel_zero_points,
        );
    }
    for m in 0..mr {
        for n in 0..nr {
            c[m * c_stride + n] = requantize_conv(acc[m][n], scales[n], params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{pack_conv_4x4c2, pack_gemm_4x4c2};
    use crate::q8gemm::q8gemm_4x4c2;
    use crate::requantization::sub_zero_point;
    use rand::Rng;

    #[test]
    fn conv_matches_reference() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 128 } else { 1 } {
            let mr = rng.random_range(1..=4);
            let nr = rng.random_range(1..=4);
            let kc = rng.random_range(1..20);
            let ks = rng.random_range(1..10);
            let pixels: Vec<Vec<u8>> = (0..6)
                .map(|_| (0..kc).map(|_| rng.random()).collect())
                .collect();
            let indirection: Vec<usize> = (0..ks * 4).map(|_| rng.random_range(0..6)).collect();
            let a: Vec<&[u8]> = indirection.iter().map(|&i| pixels[i].as_slice()).collect();
            let kernel: Vec<u8> = (0..nr * ks * kc).map(|_| rng.random()).collect();
            let bias: Vec<i32> = (0..nr).map(|_| rng.random_range(-5000..5000)).collect();
            let params = ConvQuantizationParams {
                input_zero_point: rng.random_range(0..=255),
                kernel_zero_points: (0..nr).map(|_| rng.random()).collect(),
                requantization_scales: (0..nr)
                    .map(|_| rng.random_range(0.0001f32..0.01))
                    .collect(),
                output_zero_point: rng.random_range(0..=255),
                output_min: 0,
                output_max: 255,
            };
            let w = pack_conv_4x4c2(nr, ks, kc, &kernel, &bias);
            let mut c = vec![0x55u8; 16];
            q8conv_4x4c2(mr, nr, kc, ks, &a, &w, &mut c, 4, 0, &params);
            for m in 0..4 {
                for n in 0..4 {
                    let specialized = c[m * 4 + n];
                    let fallback = if m < mr && n < nr {
                        let mut acc = bias[n];
                        for s in 0..ks {
                            for i in 0..kc {
                                let x = sub_zero_point(a[4 * s + m][i], params.input_zero_point);
                                let y = kernel[(n * ks + s) * kc + i] as i32
                                    - params.kernel_zero_points[n] as i32;
                                acc += x * y;
                            }
                        }
                        requantize_conv(acc, params.requantization_scales[n], &params)
                    } else {
                        0x55
                    };
                    assert!(
                        specialized == fallback,
                        "specialized = {specialized:?}, fallback = {fallback:?}."
                    );
                }
            }
        }
    }

    #[test]
    fn one_by_one_conv_is_gemm() {
        let mut rng = rand::rng();
        let kc = 7;
        let rows: Vec<Vec<u8>> = (0..4)
            .map(|_| (0..kc).map(|_| rng.random()).collect())
            .collect();
        let kernel: Vec<u8> = (0..4 * kc).map(|_| rng.random()).collect();
        let params = ConvQuantizationParams {
            input_zero_point: 17,
            kernel_zero_points: vec![3, 5, 7, 11],
            requantization_scales: vec![0.002; 4],
            output_zero_point: 120,
            output_min: 0,
            output_max: 255,
        };
        let a: Vec<&[u8]> = rows.iter().map(Vec::as_slice).collect();
        let w = pack_conv_4x4c2(4, 1, kc, &kernel, &[1, 2, 3, 4]);
        let mut specialized = [0u8; 16];
        q8conv_4x4c2(4, 4, kc, 1, &a, &w, &mut specialized, 4, 0, &params);
        let flat: Vec<u8> = rows.concat();
        let w = pack_gemm_4x4c2(4, kc, &kernel, &[1, 2, 3, 4]);
        let mut fallback = [0u8; 16];
        q8gemm_4x4c2(4, 4, kc, &flat, kc, &w, &mut fallback, 4, 0, &params);
        assert!(
            specialized == fallback,
            "specialized = {specialized:?}, fallback = {fallback:?}."
        );
    }
}
