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

/*

## packed weights layout for 4x4c2 kernels

header = | bias 0 | bias 1 | bias 2 | bias 3 | (i32, little endian, total bytes = 16)

block j covers reduction elements 2j and 2j+1 (total bytes = 8):

byte | 0           | 1             | 2           | 3             | ... | 6           | 7             |
     | column 0,2j | column 0,2j+1 | column 1,2j | column 1,2j+1 | ... | column 3,2j | column 3,2j+1 |

gemm weights = | header | block 0 | block 1 | ... | block ceil(k/2)-1 |

conv weights = | header | blocks of kernel position 0 | ... | blocks of kernel position ks-1 |

Each kernel position carries ceil(kc/2) blocks. Columns past `nr` and the odd
tail element of `k` are zero and never read as data.

*/

use zerocopy::FromBytes;

pub const HEADER_BYTES: usize = 16;
pub const BLOCK_BYTES: usize = 8;

pub fn blocks_len(k: usize) -> usize {
    k.div_ceil(2) * BLOCK_BYTES
}

pub fn packed_len(k: usize) -> usize {
    HEADER_BYTES + blocks_len(k)
}

pub fn packed_conv_len(ks: usize, kc: usize) -> usize {
    HEADER_BYTES + ks * blocks_len(kc)
}

fn header(nr: usize, bias: &[i32]) -> Vec<u8> {
    assert!((1..=4).contains(&nr));
    assert_eq!(bias.len(), nr);
    let mut result = Vec::new();
    for n in 0..4 {
        result.extend_from_slice(&bias.get(n).copied().unwrap_or(0).to_le_bytes());
    }
    result
}

fn push_blocks(result: &mut Vec<u8>, nr: usize, k: usize, column: impl Fn(usize, usize) -> u8) {
    for j in 0..k.div_ceil(2) {
        for n in 0..4 {
            for i in [2 * j, 2 * j + 1] {
                result.push(if n < nr && i < k { column(n, i) } else { 0 });
            }
        }
    }
}

/// `kernel` holds `nr` columns of `k` bytes each, column after column.
pub fn pack_gemm_4x4c2(nr: usize, k: usize, kernel: &[u8], bias: &[i32]) -> Vec<u8> {
    assert_eq!(kernel.len(), nr * k);
    let mut result = header(nr, bias);
    result.reserve(blocks_len(k));
    push_blocks(&mut result, nr, k, |n, i| kernel[n * k + i]);
    result
}

/// `kernel` is indexed as `[column][kernel position][channel]`.
pub fn pack_conv_4x4c2(nr: usize, ks: usize, kc: usize, kernel: &[u8], bias: &[i32]) -> Vec<u8> {
    assert_eq!(kernel.len(), nr * ks * kc);
    let mut result = header(nr, bias);
    result.reserve(ks * blocks_len(kc));
    for s in 0..ks {
        push_blocks(&mut result, nr, kc, |n, i| kernel[(n * ks + s) * kc + i]);
    }
    result
}

/// Splits packed weights into the bias header and the blocks behind it.
pub(crate) fn split_bias(w: &[u8]) -> ([i32; 4], &[u8]) {
    let Ok((bias, blocks)) = <[[u8; 4]; 4]>::read_from_prefix(w) else {
        panic!("packed weights are shorter than the bias header");
    };
    (bias.map(i32::from_le_bytes), blocks)
}
