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

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("error while validating options: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{kernel_zero_points} kernel zero points but {values} per-channel values")]
    ChannelMismatch {
        kernel_zero_points: usize,
        values: usize,
    },
}
