// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cipher block chaining over a single-block primitive.
//!
//! Encryption is `C_i = E(P_i ^ C_{i-1})` with `C_{-1} = IV`, so block `i` cannot start before
//! block `i - 1` is done. Decryption is `P_i = D(C_i) ^ C_{i-1}`, where every `C_i` is already
//! known. Padding is always applied on the way in and checked on the way out.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::{Error, Result};
use crate::keys::{Iv, Key, KeySize};
use crate::padding::{self, BLOCK_SIZE};

/// A 16-byte block permutation and its inverse. This is the only thing CBC needs from AES.
pub trait BlockPrimitive {
    fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]);
    fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]);
}

/// AES with its key schedule already expanded
#[derive(Clone)]
pub enum Aes {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Aes {
    pub fn new(key: &Key) -> Result<Aes> {
        let bytes = key.as_bytes();
        let invalid = |_| Error::InvalidKeySize {
            bits: bytes.len() * 8,
        };

        let cipher = match key.size() {
            KeySize::Aes128 => Aes::Aes128(Aes128::new_from_slice(bytes).map_err(invalid)?),
            KeySize::Aes192 => Aes::Aes192(Aes192::new_from_slice(bytes).map_err(invalid)?),
            KeySize::Aes256 => Aes::Aes256(Aes256::new_from_slice(bytes).map_err(invalid)?),
        };

        Ok(cipher)
    }
}

impl BlockPrimitive for Aes {
    fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Aes::Aes128(c) => c.encrypt_block(block),
            Aes::Aes192(c) => c.encrypt_block(block),
            Aes::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Aes::Aes128(c) => c.decrypt_block(block),
            Aes::Aes192(c) => c.decrypt_block(block),
            Aes::Aes256(c) => c.decrypt_block(block),
        }
    }
}

fn xor_in_place(dst: &mut [u8; BLOCK_SIZE], src: &[u8; BLOCK_SIZE]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= *s;
    }
}

/// Pads and encrypts `plaintext` under AES-CBC. The output is always
/// `(plaintext.len() / 16 + 1) * 16` bytes long.
pub fn encrypt(plaintext: &[u8], key: &Key, iv: &Iv) -> Result<Vec<u8>> {
    let cipher = Aes::new(key)?;
    Ok(encrypt_with(&cipher, plaintext, iv))
}

/// Decrypts and unpads AES-CBC `ciphertext`. A wrong key or IV shows up as a padding error.
pub fn decrypt(ciphertext: &[u8], key: &Key, iv: &Iv) -> Result<Vec<u8>> {
    let cipher = Aes::new(key)?;
    decrypt_with(&cipher, ciphertext, iv)
}

pub fn encrypt_with<B: BlockPrimitive + ?Sized>(cipher: &B, plaintext: &[u8], iv: &Iv) -> Vec<u8> {
    let mut buf = padding::pad(plaintext, BLOCK_SIZE);

    let mut prev = *iv;
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);

        xor_in_place(&mut block, &prev);
        cipher.encrypt_block(&mut block);

        chunk.copy_from_slice(&block);
        prev = block;
    }

    buf
}

pub fn decrypt_with<B: BlockPrimitive + ?Sized>(
    cipher: &B,
    ciphertext: &[u8],
    iv: &Iv,
) -> Result<Vec<u8>> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidLength {
            what: "ciphertext that is not a multiple of the 16-byte block",
            len: ciphertext.len(),
        });
    }

    let mut buf = ciphertext.to_vec();

    let mut prev = *iv;
    for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        let this_ct = block;

        cipher.decrypt_block(&mut block);
        xor_in_place(&mut block, &prev);

        chunk.copy_from_slice(&block);
        prev = this_ct;
    }

    let plain_len = padding::unpad(&buf, BLOCK_SIZE)?.len();
    buf.truncate(plain_len);

    Ok(buf)
}
