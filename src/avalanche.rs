// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building one-bit-apart input pairs and measuring how far apart their outputs land.

use rand::Rng;

use crate::error::{Error, Result};

/// Returns a copy of `data` with exactly one uniformly chosen bit flipped.
///
/// `rng` only picks a position, so any general-purpose generator will do.
pub fn flip_one_bit<R: Rng + ?Sized>(rng: &mut R, data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let byte_idx = rng.gen_range(0..data.len());
    let bit_idx = rng.gen_range(0..8u32);

    let mut flipped = data.to_vec();
    flipped[byte_idx] ^= 1u8 << bit_idx;

    Ok(flipped)
}

fn check_lengths(a: &[u8], b: &[u8]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Number of bit positions at which `a` and `b` differ
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u64> {
    check_lengths(a, b)?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| u64::from((x ^ y).count_ones()))
        .sum())
}

/// Percentage of bits that differ between `a` and `b`. A strong cipher should sit near 50.
pub fn avalanche_percentage(a: &[u8], b: &[u8]) -> Result<f64> {
    let distance = hamming_distance(a, b)?;
    if a.is_empty() {
        return Ok(0.0);
    }

    let total_bits = (a.len() as f64) * 8f64;
    Ok(100f64 * (distance as f64) / total_bits)
}
