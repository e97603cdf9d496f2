// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate cbc_avalanche;
extern crate rand;
extern crate rand_chacha;

use cbc_avalanche::report::{write_avalanche_csv, AVALANCHE_HEADER};
use cbc_avalanche::{
    cbc, run_experiments, BenchRng, Error, FlipType, Harness, Key, KeySize, RunOpts,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn aes128_zero_block_round_trip() {
    let key = Key::from_bytes(&[b'K'; 16]).unwrap();
    let iv = [b'I'; 16];
    let plaintext = [0u8; 64];

    let ciphertext = cbc::encrypt(&plaintext, &key, &iv).unwrap();
    assert_eq!(ciphertext.len(), 80);
    assert_ne!(&ciphertext[..64], &plaintext[..]);
    assert_eq!(cbc::decrypt(&ciphertext, &key, &iv).unwrap(), plaintext.to_vec());
}

#[test]
fn wrong_key_never_yields_plaintext() {
    let key = Key::from_bytes(&[0u8; 16]).unwrap();
    let mut wrong = [0u8; 16];
    wrong[0] = 1;
    let wrong = Key::from_bytes(&wrong).unwrap();
    let iv = [0u8; 16];

    let ciphertext = cbc::encrypt(&[0u8; 64], &key, &iv).unwrap();
    match cbc::decrypt(&ciphertext, &wrong, &iv) {
        Err(Error::Padding(_)) => (),
        other => panic!("expected a padding error, got {:?}", other),
    }
}

#[test]
fn fifty_plaintext_trials_at_aes128() {
    let mut harness = Harness::new(Some(0x6b6c816d));
    let records = harness.plaintext_avalanche(50, KeySize::Aes128).unwrap();

    assert_eq!(records.len(), 50);
    for r in &records {
        assert_eq!(r.flip_type, FlipType::Plaintext);
        assert_eq!(r.key_size_bits, 128);
        assert!(r.avalanche_percent >= 0.0 && r.avalanche_percent <= 100.0);
    }

    let mut csv = Vec::new();
    write_avalanche_csv(&mut csv, &records).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert_eq!(csv.lines().next(), Some(AVALANCHE_HEADER));
    assert_eq!(csv.lines().count(), 51);
    assert!(csv.lines().nth(1).unwrap().starts_with("1,plaintext,128,"));
}

#[test]
fn filtered_avalanche_run() {
    let opts = RunOpts {
        filter: Some("avalanche/".to_string()),
        trials: 8,
        skip_performance: true,
        key_sizes: vec![KeySize::Aes192],
        ..RunOpts::default()
    };
    let mut harness = Harness::with_rngs(ChaCha20Rng::seed_from_u64(1), BenchRng::seed_from_u64(2));

    let results = run_experiments(&opts, &mut harness, &[], |_| Ok(())).unwrap();

    assert!(results.performance.is_empty());
    assert_eq!(results.avalanche.len(), 16);
    assert_eq!(
        results.avalanche.iter().filter(|r| r.flip_type == FlipType::Key).count(),
        8
    );
    assert!(results.avalanche.iter().all(|r| r.key_size_bits == 192));
}
