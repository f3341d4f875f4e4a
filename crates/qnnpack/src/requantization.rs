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

use crate::params::{AvgPoolQuantizationParams, ConvQuantizationParams};

/// Activation minus the input zero point. With `runtime_quantization`
/// disabled the zero point is folded in ahead of time and ignored here.
#[inline(always)]
pub fn sub_zero_point(x: u8, zero_point: i16) -> i32 {
    if cfg!(feature = "runtime_quantization") {
        x as i32 - zero_point as i32
    } else {
        x as i32
    }
}

#[inline(always)]
fn saturate_u8(x: i32) -> u8 {
    let x = x.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    x.clamp(0, u8::MAX as i16) as u8
}

/// Scales an accumulator and narrows it to `u8`.
///
/// The product rounds half to even, then saturates to `i32` and to `i16`.
/// The zero point is added with wraparound in 16 bits before the final
/// saturation to `u8` and the clamp to `[output_min, output_max]`.
#[inline(always)]
pub fn requantize_conv(acc: i32, scale: f32, params: &ConvQuantizationParams) -> u8 {
    let scaled = (acc as f32 * scale).round_ties_even() as i32;
    let narrowed = scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    let shifted = narrowed.wrapping_add(params.output_zero_point);
    let x = shifted.clamp(0, u8::MAX as i16) as u8;
    x.min(params.output_max).max(params.output_min)
}

#[inline(always)]
pub fn requantize_avgpool(acc: i32, params: &AvgPoolQuantizationParams) -> u8 {
    let f = (acc as f32 * params.scale).max(params.fmin).min(params.fmax);
    let x = ((f + params.fmagic).to_bits() as i32).wrapping_sub(params.imagic);
    saturate_u8(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn conv_params(output_zero_point: i16, output_min: u8, output_max: u8) -> ConvQuantizationParams {
        ConvQuantizationParams {
            input_zero_point: 0,
            kernel_zero_points: vec![0],
            requantization_scales: vec![1.0],
            output_zero_point,
            output_min,
            output_max,
        }
    }

    #[test]
    fn conv_rounds_half_to_even() {
        let params = conv_params(0, 0, 255);
        assert_eq!(requantize_conv(5, 0.5, &params), 2);
        assert_eq!(requantize_conv(7, 0.5, &params), 4);
        assert_eq!(requantize_conv(3, 0.5, &params), 2);
        assert_eq!(requantize_conv(-3, 0.5, &params), 0);
    }

    #[test]
    fn conv_saturates_and_clamps() {
        let params = conv_params(100, 20, 240);
        assert_eq!(requantize_conv(32_000, 1.0, &params), 240);
        assert_eq!(requantize_conv(i32::MIN, 1.0, &params), 20);
        assert_eq!(requantize_conv(-90, 1.0, &params), 20);
        assert_eq!(requantize_conv(-70, 1.0, &params), 30);
        assert_eq!(requantize_conv(100, 1.0, &params), 200);
        assert_eq!(requantize_conv(200, 1.0, &params), 240);
    }

    #[test]
    fn conv_zero_point_wraps_in_16_bits() {
        let params = conv_params(i16::MAX, 0, 255);
        // 32767 + 1 wraps to -32768, which saturates to 0
        assert_eq!(requantize_conv(1, 1.0, &params), 0);
    }

    #[test]
    fn avgpool_matches_rounding() {
        let mut rng = rand::rng();
        for _ in 0..if cfg!(not(miri)) { 256 } else { 1 } {
            let zero_point: u8 = rng.random();
            let min: u8 = rng.random_range(0..=128);
            let max: u8 = rng.random_range(128..=255);
            let scale = rng.random_range(0.001f32..2.0);
            let params = AvgPoolQuantizationParams::new(0, scale, zero_point, min, max);
            let acc = rng.random_range(-100_000..100_000);
            let specialized = requantize_avgpool(acc, &params);
            let fallback = ((acc as f32 * scale).round_ties_even() as i32 + zero_point as i32)
                .clamp(min as i32, max as i32) as u8;
            assert!(
                specialized == fallback,
                "specialized = {specialized:?}, fallback = {fallback:?}."
            );
        }
    }

    #[test]
    fn zero_point_subtraction() {
        if cfg!(feature = "runtime_quantization") {
            assert_eq!(sub_zero_point(10, 128), -118);
            assert_eq!(sub_zero_point(255, -1), 256);
        } else {
            assert_eq!(sub_zero_point(10, 128), 10);
        }
    }
}
