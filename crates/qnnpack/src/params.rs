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

/// Requantization parameters of the static 4x4c2 GEMM and convolution kernels.
///
/// `kernel_zero_points` and `requantization_scales` are indexed by output
/// channel; a kernel call reads entries `output_channel_index..output_channel_index + nr`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvQuantizationParams {
    pub input_zero_point: i16,
    pub kernel_zero_points: Vec<u8>,
    pub requantization_scales: Vec<f32>,
    pub output_zero_point: i16,
    pub output_min: u8,
    pub output_max: u8,
}

impl ConvQuantizationParams {
    pub(crate) fn channels(&self, output_channel_index: usize, nr: usize) -> ([i32; 4], [f32; 4]) {
        assert!(self.kernel_zero_points.len() >= output_channel_index + nr);
        assert!(self.requantization_scales.len() >= output_channel_index + nr);
        let mut zero_points = [0; 4];
        let mut scales = [0.0; 4];
        for n in 0..nr {
            zero_points[n] = self.kernel_zero_points[output_channel_index + n] as i32;
            scales[n] = self.requantization_scales[output_channel_index + n];
        }
        (zero_points, scales)
    }
}

/// Parameters of the dynamic-quantization GEMM, which produces `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicQuantizationParams {
    pub input_zero_point: i16,
    pub kernel_zero_points: Vec<u8>,
    pub multipliers: Vec<f32>,
}

impl DynamicQuantizationParams {
    pub(crate) fn channels(&self, output_channel_index: usize, nr: usize) -> ([i32; 4], [f32; 4]) {
        assert!(self.kernel_zero_points.len() >= output_channel_index + nr);
        assert!(self.multipliers.len() >= output_channel_index + nr);
        let mut zero_points = [0; 4];
        let mut multipliers = [0.0; 4];
        for n in 0..nr {
            zero_points[n] = self.kernel_zero_points[output_channel_index + n] as i32;
            multipliers[n] = self.multipliers[output_channel_index + n];
        }
        (zero_points, multipliers)
    }
}

/// Parameters shared by the average pooling kernels.
///
/// Requantization uses the magic-number trick: after clamping, adding
/// `fmagic` (`2^23 + 2^22`) leaves the rounded integer in the low mantissa
/// bits, and subtracting `imagic` removes the exponent while adding the
/// output zero point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvgPoolQuantizationParams {
    pub bias: i32,
    pub scale: f32,
    pub fmin: f32,
    pub fmax: f32,
    pub fmagic: f32,
    pub imagic: i32,
    pub output_zero_point: i16,
    pub output_min: u8,
    pub output_max: u8,
}

impl AvgPoolQuantizationParams {
    pub const FMAGIC: f32 = 12582912.0;
    pub const IMAGIC: i32 = 0x4B40_0000;

    pub fn new(bias: i32, scale: f32, output_zero_point: u8, output_min: u8, output_max: u8) -> Self {
        debug_assert!(scale >= f32::from_bits(0x2f80_0000) && scale < 256.0);
        debug_assert!(output_min <= output_max);
        let zero_point = output_zero_point as i32;
        Self {
            bias,
            scale,
            fmin: (output_min as i32 - zero_point) as f32,
            fmax: (output_max as i32 - zero_point) as f32,
            fmagic: Self::FMAGIC,
            imagic: Self::IMAGIC - zero_point,
            output_zero_point: output_zero_point as i16,
            output_min,
            output_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avgpool_constants() {
        let params = AvgPoolQuantizationParams::new(-7, 0.125, 128, 10, 250);
        assert_eq!(params.fmin, -118.0);
        assert_eq!(params.fmax, 122.0);
        assert_eq!(params.fmagic.to_bits(), 0x4B40_0000);
        assert_eq!(params.imagic, 0x4B40_0000 - 128);
        assert_eq!(params.output_zero_point, 128);
    }

    #[test]
    fn channel_window() {
        let params = ConvQuantizationParams {
            input_zero_point: 3,
            kernel_zero_points: vec![1, 2, 3, 4, 5, 6],
            requantization_scales: vec![0.5, 0.25, 0.125, 1.0, 2.0, 4.0],
            output_zero_point: 0,
            output_min: 0,
            output_max: 255,
        };
        let (zero_points, scales) = params.channels(3, 3);
        assert_eq!(zero_points, [4, 5, 6, 0]);
        assert_eq!(scales, [1.0, 2.0, 4.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn channel_window_out_of_range() {
        let params = DynamicQuantizationParams {
            input_zero_point: 0,
            kernel_zero_points: vec![0; 4],
            multipliers: vec![1.0; 4],
        };
        let _ = params.channels(2, 4);
    }
}
