// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key and IV material. Everything here draws from a caller-supplied CSPRNG. Outside of tests
//! that is `OsRng`; the harness never hands its [`BenchRng`](crate::harness::BenchRng) here.

use std::fmt;

use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::padding::BLOCK_SIZE;

/// A CBC initialization vector
pub type Iv = [u8; BLOCK_SIZE];

/// The three AES key lengths
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    pub fn from_bits(bits: usize) -> Result<KeySize> {
        match bits {
            128 => Ok(KeySize::Aes128),
            192 => Ok(KeySize::Aes192),
            256 => Ok(KeySize::Aes256),
            _ => Err(Error::InvalidKeySize { bits }),
        }
    }

    pub fn from_len(len: usize) -> Result<KeySize> {
        KeySize::from_bits(len.saturating_mul(8))
    }

    pub fn bits(self) -> usize {
        match self {
            KeySize::Aes128 => 128,
            KeySize::Aes192 => 192,
            KeySize::Aes256 => 256,
        }
    }

    pub fn byte_len(self) -> usize {
        self.bits() / 8
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "aes{}", self.bits())
    }
}

/// An AES key of 16, 24 or 32 bytes. Read-only once built, so clones can be shared freely.
#[derive(Clone, PartialEq, Eq)]
pub struct Key(Vec<u8>);

impl Key {
    /// Copies `bytes` into a key, rejecting any length other than 16, 24 or 32
    pub fn from_bytes(bytes: &[u8]) -> Result<Key> {
        KeySize::from_len(bytes.len())?;
        Ok(Key(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn size(&self) -> KeySize {
        match self.0.len() {
            16 => KeySize::Aes128,
            24 => KeySize::Aes192,
            _ => KeySize::Aes256,
        }
    }
}

// Never print key bytes
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Key({}, <redacted>)", self.size())
    }
}

/// Generates a fresh key of `bits` bits. Fails on anything but 128, 192 or 256.
pub fn generate_key<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, bits: usize) -> Result<Key> {
    let size = KeySize::from_bits(bits)?;
    Ok(generate_key_of_size(rng, size))
}

pub fn generate_key_of_size<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, size: KeySize) -> Key {
    let mut bytes = vec![0u8; size.byte_len()];
    rng.fill_bytes(&mut bytes);
    Key(bytes)
}

/// Generates a fresh 16-byte IV
pub fn generate_iv<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Iv {
    let mut iv = [0u8; BLOCK_SIZE];
    rng.fill_bytes(&mut iv);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn key_lengths_follow_bits() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for &(bits, len) in &[(128, 16), (192, 24), (256, 32)] {
            let key = generate_key(&mut rng, bits).unwrap();
            assert_eq!(key.as_bytes().len(), len);
            assert_eq!(key.size().bits(), bits);
        }
    }

    #[test]
    fn rejects_other_key_sizes() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for &bits in &[0, 64, 127, 129, 512] {
            match generate_key(&mut rng, bits) {
                Err(Error::InvalidKeySize { bits: b }) => assert_eq!(b, bits),
                other => panic!("expected InvalidKeySize, got {:?}", other),
            }
        }
    }

    #[test]
    fn key_from_bytes_checks_length() {
        assert!(Key::from_bytes(&[0u8; 16]).is_ok());
        assert!(Key::from_bytes(&[0u8; 32]).is_ok());
        assert!(matches!(
            Key::from_bytes(&[0u8; 20]),
            Err(Error::InvalidKeySize { bits: 160 })
        ));
    }

    #[test]
    fn os_rng_keys_and_ivs_differ() {
        let a = generate_key(&mut OsRng, 128).unwrap();
        let b = generate_key(&mut OsRng, 128).unwrap();
        assert_ne!(a, b);
        assert_ne!(generate_iv(&mut OsRng), generate_iv(&mut OsRng));
    }

    #[test]
    fn debug_hides_key_bytes() {
        let key = Key::from_bytes(&[0x41u8; 24]).unwrap();
        let shown = format!("{:?}", key);
        assert_eq!(shown, "Key(aes192, <redacted>)");
    }
}
