// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The encrypted file layout: `IV (16 bytes) || ciphertext (N * 16 bytes)`.
//!
//! There is no magic number, no length prefix, no key-size tag and no MAC. The key is handed
//! back to the caller at encryption time and is never written.

use rand::{CryptoRng, RngCore};

use crate::cbc;
use crate::error::{Error, Result};
use crate::keys::{self, Iv, Key};
use crate::padding::BLOCK_SIZE;

/// Encrypts `plaintext` under a freshly generated `key_bits`-bit key and IV. Returns the key
/// along with the container bytes.
pub fn encrypt_to_container<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    plaintext: &[u8],
    key_bits: usize,
) -> Result<(Key, Vec<u8>)> {
    let key = keys::generate_key(rng, key_bits)?;
    let iv = keys::generate_iv(rng);

    let ciphertext = cbc::encrypt(plaintext, &key, &iv)?;

    let mut container = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    container.extend_from_slice(&iv);
    container.extend_from_slice(&ciphertext);

    Ok((key, container))
}

/// Splits off the IV and decrypts the rest
pub fn decrypt_from_container(container: &[u8], key: &Key) -> Result<Vec<u8>> {
    if container.len() < BLOCK_SIZE {
        return Err(Error::InvalidLength {
            what: "container shorter than the 16-byte IV",
            len: container.len(),
        });
    }

    let (iv_bytes, ciphertext) = container.split_at(BLOCK_SIZE);
    let mut iv: Iv = [0u8; BLOCK_SIZE];
    iv.copy_from_slice(iv_bytes);

    cbc::decrypt(ciphertext, key, &iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn container_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let msg = b"Hello AES project!";

        for &bits in &[128, 192, 256] {
            let (key, container) = encrypt_to_container(&mut rng, msg, bits).unwrap();
            assert_eq!(key.size().bits(), bits);
            // 18 bytes of plaintext pad to 32, plus the IV
            assert_eq!(container.len(), 16 + 32);
            assert_eq!(decrypt_from_container(&container, &key).unwrap(), msg.to_vec());
        }
    }

    #[test]
    fn container_starts_with_iv() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let (key, container) = encrypt_to_container(&mut rng, &[1, 2, 3], 128).unwrap();

        let mut iv = [0u8; 16];
        iv.copy_from_slice(&container[..16]);
        assert_eq!(cbc::encrypt(&[1, 2, 3], &key, &iv).unwrap(), container[16..].to_vec());
    }

    #[test]
    fn short_container_is_invalid_length() {
        let key = Key::from_bytes(&[0u8; 16]).unwrap();
        match decrypt_from_container(&[0u8; 15], &key) {
            Err(Error::InvalidLength { len, .. }) => assert_eq!(len, 15),
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn wrong_key_is_padding_error() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let (_, container) = encrypt_to_container(&mut rng, &[0u8; 64], 128).unwrap();

        let mut wrong = [0u8; 16];
        wrong[0] = 1;
        let wrong = Key::from_bytes(&wrong).unwrap();
        assert!(matches!(
            decrypt_from_container(&container, &wrong),
            Err(Error::Padding(_))
        ));
    }

    #[test]
    fn rejects_bad_key_bits() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(
            encrypt_to_container(&mut rng, b"x", 100),
            Err(Error::InvalidKeySize { bits: 100 })
        ));
    }
}
