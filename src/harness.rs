// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The experiments themselves. Each one is a function of a trial (or run) count and a key size
//! and hands back plain records; nothing here prints or touches the filesystem.

use std::fmt;
use std::time::Instant;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaChaRng;
use tracing::debug;

use crate::avalanche::{avalanche_percentage, flip_one_bit};
use crate::cbc::{self, Aes};
use crate::error::Result;
use crate::keys::{self, Key, KeySize};
use crate::padding::BLOCK_SIZE;
use crate::stats::OnlineStats;

/// The generator used for plaintexts and bit positions. Seedable, and never used for keys or IVs.
pub type BenchRng = ChaChaRng;

/// Plaintext length of the avalanche experiments: four AES blocks
pub const AVALANCHE_PLAINTEXT_LEN: usize = BLOCK_SIZE * 4;

pub const DEFAULT_TRIALS: usize = 50;
pub const DEFAULT_RUNS: usize = 10;

/// Fixture names and sizes timed by default
pub const PAYLOAD_SIZES: [(&str, usize); 4] = [
    ("pt_1KB.bin", 1024),
    ("pt_10KB.bin", 10 * 1024),
    ("pt_100KB.bin", 100 * 1024),
    ("pt_1MB.bin", 1024 * 1024),
];

/// Which input had a bit flipped
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FlipType {
    Plaintext,
    Key,
}

impl FlipType {
    pub fn as_str(self) -> &'static str {
        match self {
            FlipType::Plaintext => "plaintext",
            FlipType::Key => "key",
        }
    }
}

impl fmt::Display for FlipType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One avalanche trial. `trial` is 1-based within its own experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct AvalancheRecord {
    pub trial: usize,
    pub flip_type: FlipType,
    pub key_size_bits: usize,
    pub avalanche_percent: f64,
}

/// Mean encrypt and decrypt latency of one payload under one key size
#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceRecord {
    pub file_name: String,
    pub file_size_bytes: usize,
    pub key_size_bits: usize,
    pub avg_enc_time_ms: f64,
    pub avg_dec_time_ms: f64,
    pub runs: usize,
}

/// A named plaintext buffer to time
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    pub name: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Payload({}, {} bytes)", self.name, self.data.len())
    }
}

#[cfg(feature = "core-hint-black-box")]
use core::hint::black_box;

// NOTE: Without `core::hint::black_box` this is a workaround that may carry too much overhead for
// very cheap operations, or may fail to keep the work from being optimized out. It's fine for
// whole-message CBC operations.
#[cfg(not(feature = "core-hint-black-box"))]
fn black_box<T>(dummy: T) -> T {
    unsafe {
        let ret = ::std::ptr::read_volatile(&dummy);
        ::std::mem::forget(dummy);
        ret
    }
}

/// Which cipher direction a timing belongs to
#[derive(Copy, Clone, Debug)]
enum Op {
    Encrypt,
    Decrypt,
}

/// Used for timing single cipher operations at a time
#[derive(Default)]
struct OpTimer {
    // Milliseconds
    enc: OnlineStats,
    dec: OnlineStats,
}

impl OpTimer {
    /// Runs and times `f`, which must contain only the operation being measured
    fn run_one<T, F: FnOnce() -> T>(&mut self, op: Op, f: F) -> T {
        let start = Instant::now();
        let out = black_box(f());
        let ms = start.elapsed().as_secs_f64() * 1_000f64;

        match op {
            Op::Encrypt => self.enc.push(ms),
            Op::Decrypt => self.dec.push(ms),
        }
        out
    }
}

/// Runs the avalanche and timing experiments.
///
/// Holds two generators: `csprng` for every key and IV, and a [`BenchRng`] for plaintexts and
/// bit positions. Only the latter is seedable.
pub struct Harness<C = OsRng> {
    csprng: C,
    rng: BenchRng,
}

impl Harness<OsRng> {
    /// Keys and IVs come from the OS. Test inputs come from a `BenchRng` seeded with `seed`, or
    /// from entropy if `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Harness<OsRng> {
        let rng = match seed {
            Some(s) => BenchRng::seed_from_u64(s),
            None => BenchRng::from_entropy(),
        };
        Harness::with_rngs(OsRng, rng)
    }
}

impl<C: RngCore + CryptoRng> Harness<C> {
    pub fn with_rngs(csprng: C, rng: BenchRng) -> Harness<C> {
        Harness { csprng, rng }
    }

    /// `len` bytes of test input from the bench generator
    pub fn random_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.rng.fill_bytes(&mut buf);
        buf
    }

    /// Flips one plaintext bit per trial. One key and one IV serve every trial of the call; the
    /// plaintext is fresh each trial.
    pub fn plaintext_avalanche(
        &mut self,
        trials: usize,
        key_size: KeySize,
    ) -> Result<Vec<AvalancheRecord>> {
        let key = keys::generate_key_of_size(&mut self.csprng, key_size);
        let iv = keys::generate_iv(&mut self.csprng);
        let cipher = Aes::new(&key)?;

        let mut records = Vec::with_capacity(trials);
        for i in 0..trials {
            let plaintext = self.random_bytes(AVALANCHE_PLAINTEXT_LEN);
            let flipped = flip_one_bit(&mut self.rng, &plaintext)?;

            let c1 = cbc::encrypt_with(&cipher, &plaintext, &iv);
            let c2 = cbc::encrypt_with(&cipher, &flipped, &iv);

            records.push(AvalancheRecord {
                trial: i + 1,
                flip_type: FlipType::Plaintext,
                key_size_bits: key_size.bits(),
                avalanche_percent: avalanche_percentage(&c1, &c2)?,
            });
        }

        debug!(%key_size, trials, "plaintext avalanche done");
        Ok(records)
    }

    /// Flips one key bit per trial. One plaintext serves every trial of the call; the key and
    /// the IV are fresh each trial.
    pub fn key_avalanche(
        &mut self,
        trials: usize,
        key_size: KeySize,
    ) -> Result<Vec<AvalancheRecord>> {
        let plaintext = self.random_bytes(AVALANCHE_PLAINTEXT_LEN);

        let mut records = Vec::with_capacity(trials);
        for i in 0..trials {
            let key = keys::generate_key_of_size(&mut self.csprng, key_size);
            let flipped = Key::from_bytes(&flip_one_bit(&mut self.rng, key.as_bytes())?)?;
            let iv = keys::generate_iv(&mut self.csprng);

            let c1 = cbc::encrypt(&plaintext, &key, &iv)?;
            let c2 = cbc::encrypt(&plaintext, &flipped, &iv)?;

            records.push(AvalancheRecord {
                trial: i + 1,
                flip_type: FlipType::Key,
                key_size_bits: key_size.bits(),
                avalanche_percent: avalanche_percentage(&c1, &c2)?,
            });
        }

        debug!(%key_size, trials, "key avalanche done");
        Ok(records)
    }

    /// Mean encrypt and decrypt latency in milliseconds over `runs` runs each.
    ///
    /// Uses one fresh key and IV for the call. Each decrypt run gets its own freshly produced
    /// ciphertext, made outside the timed region. Key expansion is part of the timed operation,
    /// key and IV generation is not. Both means are zero when `runs` is zero.
    pub fn time_encrypt_decrypt(
        &mut self,
        plaintext: &[u8],
        key_size: KeySize,
        runs: usize,
    ) -> Result<(f64, f64)> {
        let key = keys::generate_key_of_size(&mut self.csprng, key_size);
        let iv = keys::generate_iv(&mut self.csprng);

        let mut timer = OpTimer::default();
        for _ in 0..runs {
            timer.run_one(Op::Encrypt, || cbc::encrypt(plaintext, &key, &iv))?;
        }
        for _ in 0..runs {
            let ciphertext = cbc::encrypt(plaintext, &key, &iv)?;
            timer.run_one(Op::Decrypt, || cbc::decrypt(&ciphertext, &key, &iv))?;
        }

        Ok((timer.enc.mean(), timer.dec.mean()))
    }

    /// Times `payload` under `key_size` and packs the result into a record
    pub fn performance(
        &mut self,
        payload: &Payload,
        key_size: KeySize,
        runs: usize,
    ) -> Result<PerformanceRecord> {
        let (avg_enc_time_ms, avg_dec_time_ms) =
            self.time_encrypt_decrypt(&payload.data, key_size, runs)?;

        debug!(
            payload = %payload.name,
            %key_size,
            avg_enc_time_ms,
            avg_dec_time_ms,
            "timing done"
        );

        Ok(PerformanceRecord {
            file_name: payload.name.clone(),
            file_size_bytes: payload.data.len(),
            key_size_bits: key_size.bits(),
            avg_enc_time_ms,
            avg_dec_time_ms,
            runs,
        })
    }

    /// The default 1KB/10KB/100KB/1MB payloads, filled from the bench generator
    pub fn standard_payloads(&mut self) -> Vec<Payload> {
        PAYLOAD_SIZES
            .iter()
            .map(|&(name, size)| Payload {
                name: name.to_string(),
                data: self.random_bytes(size),
            })
            .collect()
    }
}
