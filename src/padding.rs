// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! PKCS#7 padding (RFC 5652, section 6.3).
//!
//! Pad `k - (l mod k)` octets, all of value `k - (l mod k)`, onto an input of length `l`. An input
//! that is already block-aligned still gets a full block of padding, so `unpad` never has to
//! guess whether padding is present.

use crate::error::PaddingError;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Pads `data` up to the next multiple of `block_size`. Always appends at least one byte.
///
/// # Panics
/// If `block_size` is not in `1..=255`, since a pad length has to fit in one octet.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=255).contains(&block_size),
        "PKCS#7 block size must be in 1..=255, got {}",
        block_size
    );

    let pad_len = block_size - (data.len() % block_size);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);

    padded
}

/// Strips PKCS#7 padding, returning the unpadded prefix of `padded`.
///
/// Rejects a block size outside `1..=255`, then checks length, then pad-byte range, then the
/// pad pattern. Decrypting under the wrong key
/// almost always trips one of these, which is how such a failure shows up.
pub fn unpad(padded: &[u8], block_size: usize) -> Result<&[u8], PaddingError> {
    if !(1..=255).contains(&block_size) {
        return Err(PaddingError::BlockSize { block_size });
    }

    let len = padded.len();
    if len == 0 || len % block_size != 0 {
        return Err(PaddingError::Length { len, block_size });
    }

    let pad_len = padded[len - 1] as usize;
    if pad_len < 1 || pad_len > block_size {
        return Err(PaddingError::PadByte { block_size });
    }

    let (body, tail) = padded.split_at(len - pad_len);
    if tail.iter().any(|&b| b as usize != pad_len) {
        return Err(PaddingError::PadPattern);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_partial_block() {
        let input = b"YELLOW SUBMARINE";
        let mut expected = input.to_vec();
        expected.extend_from_slice(&[4, 4, 4, 4]);

        assert_eq!(pad(input, 20), expected);
    }

    #[test]
    fn pad_aligned_input_gets_full_block() {
        let input = [0xAAu8; 32];
        let padded = pad(&input, BLOCK_SIZE);

        assert_eq!(padded.len(), 48);
        assert!(padded[32..].iter().all(|&b| b == 16));
    }

    #[test]
    fn pad_empty_input() {
        assert_eq!(pad(&[], BLOCK_SIZE), vec![16u8; 16]);
    }

    #[test]
    fn unpad_strips_padding() {
        let padded = pad(b"hello", BLOCK_SIZE);
        assert_eq!(unpad(&padded, BLOCK_SIZE).unwrap(), b"hello");
    }

    #[test]
    fn unpad_rejects_bad_length() {
        assert_eq!(
            unpad(&[], BLOCK_SIZE),
            Err(PaddingError::Length { len: 0, block_size: 16 })
        );
        assert_eq!(
            unpad(&[1u8; 15], BLOCK_SIZE),
            Err(PaddingError::Length { len: 15, block_size: 16 })
        );
    }

    #[test]
    fn unpad_rejects_out_of_range_pad_byte() {
        let mut block = [0u8; 16];
        assert_eq!(
            unpad(&block, BLOCK_SIZE),
            Err(PaddingError::PadByte { block_size: 16 })
        );

        block[15] = 17;
        assert_eq!(
            unpad(&block, BLOCK_SIZE),
            Err(PaddingError::PadByte { block_size: 16 })
        );
    }

    #[test]
    fn unpad_rejects_bad_pattern() {
        let mut block = [3u8; 16];
        block[14] = 2;
        assert_eq!(unpad(&block, BLOCK_SIZE), Err(PaddingError::PadPattern));
    }

    #[test]
    fn unpad_rejects_block_size_outside_one_octet() {
        assert_eq!(unpad(&[1u8], 0), Err(PaddingError::BlockSize { block_size: 0 }));

        // Would be well-formed if a pad byte could count past 255
        let mut padded = vec![0u8; 255];
        padded.push(1);
        assert_eq!(
            unpad(&padded, 256),
            Err(PaddingError::BlockSize { block_size: 256 })
        );
    }

    #[test]
    fn length_is_checked_before_pad_byte() {
        // Trailing zero would fail the range check, but the length check comes first
        assert!(matches!(
            unpad(&[0u8; 17], BLOCK_SIZE),
            Err(PaddingError::Length { .. })
        ));
    }

    #[test]
    fn full_padding_block_unpads_to_empty() {
        assert_eq!(unpad(&[16u8; 16], BLOCK_SIZE).unwrap(), b"");
    }
}
