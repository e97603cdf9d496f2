// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

use thiserror::Error;

/// Every way a cipher, metric, or experiment operation can fail. Messages carry lengths and
/// sizes only; key, IV and plaintext bytes never appear in them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("InvalidKeySizeError: {bits} bits (expected 128, 192 or 256)")]
    InvalidKeySize { bits: usize },

    #[error("EmptyInputError: cannot flip a bit of an empty buffer")]
    EmptyInput,

    #[error("LengthMismatchError: left operand is {left} bytes, right operand is {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("InvalidLengthError: {what} of {len} bytes")]
    InvalidLength { what: &'static str, len: usize },

    #[error("PaddingError: {0}")]
    Padding(#[from] PaddingError),

    #[error("IoError: {0}")]
    Io(#[from] io::Error),
}

/// The checks `unpad` performs, in the order it performs them
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum PaddingError {
    #[error("block size {block_size} is outside 1..=255")]
    BlockSize { block_size: usize },

    #[error("padded input of {len} bytes is not a positive multiple of {block_size}")]
    Length { len: usize, block_size: usize },

    #[error("trailing pad byte is outside 1..={block_size}")]
    PadByte { block_size: usize },

    #[error("pad bytes do not all equal the pad length")]
    PadPattern,
}

pub type Result<T> = ::std::result::Result<T, Error>;
