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

use crate::Error;
use qnnpack::{AvgPoolQuantizationParams, ConvQuantizationParams, DynamicQuantizationParams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Smallest accepted requantization scale, `2^-32`.
pub const MIN_SCALE: f32 = 2.3283064e-10;
/// Requantization scales must stay below this bound.
pub const MAX_SCALE: f32 = 256.0;

fn validate_scale(scale: f32) -> Result<(), ValidationError> {
    if !scale.is_finite() {
        return Err(ValidationError::new("scale is not finite"));
    }
    if !(MIN_SCALE..MAX_SCALE).contains(&scale) {
        return Err(ValidationError::new("scale is too large or too small"));
    }
    Ok(())
}

fn validate_scales(scales: &[f32]) -> Result<(), ValidationError> {
    scales.iter().try_for_each(|x| validate_scale(*x))
}

fn validate_multipliers(multipliers: &[f32]) -> Result<(), ValidationError> {
    if !multipliers.iter().all(|x| x.is_finite()) {
        return Err(ValidationError::new("multiplier is not finite"));
    }
    Ok(())
}

fn validate_output_range(range: &[u8; 2]) -> Result<(), ValidationError> {
    if range[0] > range[1] {
        return Err(ValidationError::new(
            "`output_range` should be in ascending order",
        ));
    }
    Ok(())
}

fn check_channels(kernel_zero_points: usize, values: usize) -> Result<(), Error> {
    if kernel_zero_points != values {
        return Err(Error::ChannelMismatch {
            kernel_zero_points,
            values,
        });
    }
    Ok(())
}

fn warn_folded_zero_point(input_zero_point: u8) {
    if !cfg!(feature = "runtime_quantization") && input_zero_point != 0 {
        log::warn!(
            "input zero point {input_zero_point} is ignored since runtime quantization is disabled"
        );
    }
}

/// Deserializes and validates an options document.
pub fn parse_options<T: DeserializeOwned + Validate>(s: &str) -> Result<T, Error> {
    let options = toml::from_str::<T>(s)?;
    options.validate()?;
    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConvQuantizationOptions {
    #[serde(default = "ConvQuantizationOptions::default_input_zero_point")]
    pub input_zero_point: u8,
    #[validate(length(min = 1))]
    pub kernel_zero_points: Vec<u8>,
    #[validate(length(min = 1), custom(function = validate_scales))]
    pub requantization_scales: Vec<f32>,
    #[serde(default = "ConvQuantizationOptions::default_output_zero_point")]
    pub output_zero_point: u8,
    #[serde(default = "ConvQuantizationOptions::default_output_range")]
    #[validate(custom(function = validate_output_range))]
    pub output_range: [u8; 2],
}

impl ConvQuantizationOptions {
    fn default_input_zero_point() -> u8 {
        0
    }
    fn default_output_zero_point() -> u8 {
        0
    }
    fn default_output_range() -> [u8; 2] {
        [u8::MIN, u8::MAX]
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        let options = parse_options::<Self>(s)?;
        check_channels(
            options.kernel_zero_points.len(),
            options.requantization_scales.len(),
        )?;
        Ok(options)
    }

    pub fn to_params(&self) -> ConvQuantizationParams {
        warn_folded_zero_point(self.input_zero_point);
        log::debug!(
            "conv quantization: {} channels, output zero point {}, output range {:?}",
            self.kernel_zero_points.len(),
            self.output_zero_point,
            self.output_range
        );
        ConvQuantizationParams {
            input_zero_point: self.input_zero_point as i16,
            kernel_zero_points: self.kernel_zero_points.clone(),
            requantization_scales: self.requantization_scales.clone(),
            output_zero_point: self.output_zero_point as i16,
            output_min: self.output_range[0],
            output_max: self.output_range[1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DynamicQuantizationOptions {
    #[serde(default = "DynamicQuantizationOptions::default_input_zero_point")]
    pub input_zero_point: u8,
    #[validate(length(min = 1))]
    pub kernel_zero_points: Vec<u8>,
    #[validate(length(min = 1), custom(function = validate_multipliers))]
    pub multipliers: Vec<f32>,
}

impl DynamicQuantizationOptions {
    fn default_input_zero_point() -> u8 {
        0
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        let options = parse_options::<Self>(s)?;
        check_channels(options.kernel_zero_points.len(), options.multipliers.len())?;
        Ok(options)
    }

    pub fn to_params(&self) -> DynamicQuantizationParams {
        warn_folded_zero_point(self.input_zero_point);
        log::debug!(
            "dynamic quantization: {} channels",
            self.kernel_zero_points.len()
        );
        DynamicQuantizationParams {
            input_zero_point: self.input_zero_point as i16,
            kernel_zero_points: self.kernel_zero_points.clone(),
            multipliers: self.multipliers.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AvgPoolQuantizationOptions {
    #[serde(default = "AvgPoolQuantizationOptions::default_bias")]
    pub bias: i32,
    #[validate(custom(function = validate_scale))]
    pub scale: f32,
    #[serde(default = "AvgPoolQuantizationOptions::default_output_zero_point")]
    pub output_zero_point: u8,
    #[serde(default = "AvgPoolQuantizationOptions::default_output_range")]
    #[validate(custom(function = validate_output_range))]
    pub output_range: [u8; 2],
}

impl AvgPoolQuantizationOptions {
    fn default_bias() -> i32 {
        0
    }
    fn default_output_zero_point() -> u8 {
        0
    }
    fn default_output_range() -> [u8; 2] {
        [u8::MIN, u8::MAX]
    }

    /// Options for averaging `window` values that share `zero_point` on
    /// both the input and the output side. The bias saturates at `i32::MIN`.
    pub fn average(window: u32, zero_point: u8) -> Self {
        let bias = -(zero_point as i64) * window as i64;
        Self {
            bias: bias.max(i32::MIN as i64) as i32,
            scale: 1.0 / window as f32,
            output_zero_point: zero_point,
            output_range: Self::default_output_range(),
        }
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        parse_options::<Self>(s)
    }

    pub fn to_params(&self) -> AvgPoolQuantizationParams {
        log::debug!(
            "avgpool quantization: bias {}, scale {}, output zero point {}",
            self.bias,
            self.scale,
            self.output_zero_point
        );
        AvgPoolQuantizationParams::new(
            self.bias,
            self.scale,
            self.output_zero_point,
            self.output_range[0],
            self.output_range[1],
        )
    }
}
