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

/// Average pooling over at most 9 taps with at least 16 channels.
///
/// Output pixel `p` reads taps `input[p * input_increment..][..ks]`; taps
/// `ks..9` read `zero` instead. Each pixel writes `kc` bytes, then skips
/// `output_increment` bytes.
pub fn q8avgpool_up16x9(
    n: usize,
    ks: usize,
    kc: usize,
    input: &[&[u8]],
    zero: &[u8],
    output: &mut [u8],
    input_increment: usize,
    output_increment: usize,
    params: &AvgPoolQuantizationParams,
) {
    debug_assert!(n != 0);
    debug_assert!((1..=9).contains(&ks));
    debug_assert!(kc >= 16);
    if ks < 9 {
        assert!(zero.len() >= kc);
    }
    let mut offset = 0;
    for p in 0..n {
        let taps = &input[p * input_increment..][..ks];
        let pixel = &mut output[offset..offset + kc];
        for (c, out) in pixel.iter_mut().enumerate() {
            let mut acc = params.bias;
            for t in 0..9 {
                let x = if t < ks { taps[t][c] } else { zero[c] };
                acc = acc.wrapping_add(x as i32);
            }
            *out = requantize_avgpool(acc, params);
        }
        offset += kc + output_increment;
    }
}

/// Average pooling over any number of taps with fewer than 16 channels.
pub fn q8avgpool_up16xm(
    n: usize,
    ks: usize,
    kc: usize,
    input: &[&[u8]],
    output: &mut [u8],
    input_increment: usize,
    output_increment: usize,
    params: &AvgPoolQuantizationParams,
) {
    debug_assert!(n != 0);
    debug_assert!(ks != 0);
    debug_assert!(kc < 16);
    let mut offset = 0;
    for p in 0..n {
        let taps = &input[p * input_increment..][..ks];
        let mut acc = [params.bias; 16];
        for tap in taps {
            for c in 0..kc {
                acc[c] = acc[c].wrapping_add(tap[c] as i32);
            }
        }
        for c in 0..kc {
            output[offset + c] = requantize_avgpool(acc[c], params);
        }
        offset += kc + output_increment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn reference(taps: &[&[u8]], c: usize, params: &AvgPoolQuantizationParams) -> u8 {
        let sum: i32 = taps.iter().map(|t| t[c] as i32).sum();
        let f = ((params.bias + sum) as f32 * params.scale).round_ties_even() as i32;
        let (min, max) = (params.output_min as i32, params.output_max as i32);
        (f + params.output_zero_point as i32).clamp(min, max) as u8
    }

    fn random_params(rng: &mut impl Rng, ks: usize) -> AvgPoolQuantizationParams {
        let zero_point: u8 = rng.random();
        AvgPoolQuantizationParams::new(
            -(zero_point as i32) * ks as i32,
            1.0 / ks as f32,
            zero_point,
            rng.random_range(0..=64),
            rng.random_range(192..=255),
        )
    }

    #[test]
    fn up16x9_matches_reference() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 128 } else { 1 } {
            let n = rng.random_range(1..5);
            let ks = rng.random_range(1..=9);
            let kc = rng.random_range(16..40);
            let input_increment = ks + rng.random_range(0..3);
            let output_increment = rng.random_range(0..4);
            let rows: Vec<Vec<u8>> = (0..8)
                .map(|_| (0..kc).map(|_| rng.random()).collect())
                .collect();
            let input: Vec<&[u8]> = (0..(n - 1) * input_increment + ks)
                .map(|_| rows[rng.random_range(0..8)].as_slice())
                .collect();
            let zero = vec![0u8; kc];
            let params = random_params(&mut rng, ks);
            let stride = kc + output_increment;
            let mut output = vec![0x5Au8; n * stride];
            q8avgpool_up16x9(
                n,
                ks,
                kc,
                &input,
                &zero,
                &mut output,
                input_increment,
                output_increment,
                &params,
            );
            for p in 0..n {
                let taps = &input[p * input_increment..][..ks];
                for c in 0..stride {
                    let specialized = output[p * stride + c];
                    let fallback = if c < kc { reference(taps, c, &params) } else { 0x5A };
                    assert!(
                        specialized == fallback,
                        "specialized = {specialized:?}, fallback = {fallback:?}."
                    );
                }
            }
        }
    }

    #[test]
    fn up16x9_missing_taps_read_zero_row() {
        let rows = [[10u8; 16], [20; 16]];
        let input: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
        let zero = [1u8; 16];
        let params = AvgPoolQuantizationParams::new(0, 1.0, 0, 0, 255);
        let mut output = [0u8; 16];
        q8avgpool_up16x9(1, 2, 16, &input, &zero, &mut output, 2, 0, &params);
        // 10 + 20 + 7 * 1
        assert_eq!(output, [37; 16]);
    }

    #[test]
    fn up16xm_matches_reference() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 128 } else { 1 } {
            let n = rng.random_range(1..5);
            let ks = rng.random_range(1..30);
            let kc = rng.random_range(1..16);
            let input_increment = ks + rng.random_range(0..3);
            let output_increment = rng.random_range(0..4);
            let rows: Vec<Vec<u8>> = (0..8)
                .map(|_| (0..kc).map(|_| rng.random()).collect())
                .collect();
            let input: Vec<&[u8]> = (0..(n - 1) * input_increment + ks)
                .map(|_| rows[rng.random_range(0..8)].as_slice())
                .collect();
            let params = random_params(&mut rng, ks);
            let stride = kc + output_increment;
            let mut output = vec![0x5Au8; n * stride];
            q8avgpool_up16xm(
                n,
                ks,
                kc,
                &input,
                &mut output,
                input_increment,
                output_increment,
                &params,
            );
            for p in 0..n {
                let taps = &input[p * input_increment..][..ks];
                for c in 0..stride {
                    let specialized = output[p * stride + c];
                    let fallback = if c < kc { reference(taps, c, &params) } else { 0x5A };
                    assert!(
                        specialized == fallback,
                        "specialized = {specialized:?}, fallback = {fallback:?}."
                    );
                }
            }
        }
    }
}
