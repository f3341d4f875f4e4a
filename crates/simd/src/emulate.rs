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

use zerocopy::FromZeros;

/// Copies `count` elements into a zeroed buffer of `N` lanes.
#[inline(always)]
pub fn partial_load<T: FromZeros + Copy, const N: usize>(src: &[T], count: usize) -> [T; N] {
    debug_assert!(count <= N);
    let count = count.min(N);
    let mut buffer = <[T; N]>::new_zeroed();
    buffer[..count].copy_from_slice(&src[..count]);
    buffer
}

/// Copies the first `count` lanes of `buffer` to `dst`.
#[inline(always)]
pub fn partial_store<T: Copy, const N: usize>(buffer: &[T; N], dst: &mut [T], count: usize) {
    debug_assert!(count <= N);
    let count = count.min(N);
    if count == 0 {
        return;
    }
    dst[..count].copy_from_slice(&buffer[..count]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_load_zeroes_tail() {
        let src = [7u16, 8, 9];
        let buffer: [u16; 8] = partial_load(&src, 2);
        assert_eq!(buffer, [7, 8, 0, 0, 0, 0, 0, 0]);
        let buffer: [u16; 8] = partial_load(&src, 0);
        assert_eq!(buffer, [0; 8]);
    }

    #[test]
    fn partial_store_keeps_tail() {
        let buffer = [1u16, 2, 3, 4];
        let mut dst = [9u16; 6];
        partial_store(&buffer, &mut dst, 3);
        assert_eq!(dst, [1, 2, 3, 9, 9, 9]);
        partial_store(&buffer, &mut dst, 0);
        assert_eq!(dst, [1, 2, 3, 9, 9, 9]);
    }
}
