// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CSV output and plaintext fixtures. Column names here are what downstream tooling reads, so
//! they don't change.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::harness::{AvalancheRecord, Payload, PerformanceRecord, PAYLOAD_SIZES};
use crate::runner::RunResults;

pub const AVALANCHE_CSV: &str = "results_avalanche.csv";
pub const PERFORMANCE_CSV: &str = "results_performance.csv";

pub const AVALANCHE_HEADER: &str = "trial,type,key_size_bits,avalanche_percent";
pub const PERFORMANCE_HEADER: &str =
    "file_name,file_size_bytes,key_size_bits,avg_enc_time_ms,avg_dec_time_ms,runs";

pub fn write_avalanche_csv<W: Write>(out: &mut W, records: &[AvalancheRecord]) -> io::Result<()> {
    writeln!(out, "{}", AVALANCHE_HEADER)?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{:.4}",
            r.trial, r.flip_type, r.key_size_bits, r.avalanche_percent
        )?;
    }
    Ok(())
}

pub fn write_performance_csv<W: Write>(
    out: &mut W,
    records: &[PerformanceRecord],
) -> io::Result<()> {
    writeln!(out, "{}", PERFORMANCE_HEADER)?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{:.4},{:.4},{}",
            r.file_name,
            r.file_size_bytes,
            r.key_size_bits,
            r.avg_enc_time_ms,
            r.avg_dec_time_ms,
            r.runs
        )?;
    }
    Ok(())
}

/// Writes each non-empty record set of `results` into `dir`, creating it if needed. Returns the
/// paths written.
pub fn write_results(dir: &Path, results: &RunResults) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if !results.avalanche.is_empty() {
        let path = dir.join(AVALANCHE_CSV);
        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        write_avalanche_csv(&mut file, &results.avalanche)?;
        file.flush()?;
        written.push(path);
    }

    if !results.performance.is_empty() {
        let path = dir.join(PERFORMANCE_CSV);
        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        write_performance_csv(&mut file, &results.performance)?;
        file.flush()?;
        written.push(path);
    }

    Ok(written)
}

/// Loads the standard `pt_*.bin` fixtures from `dir`. Missing ones are filled by `random_bytes`
/// and written out first; existing ones are reused as they are.
pub fn load_or_create_payloads<F>(dir: &Path, mut random_bytes: F) -> io::Result<Vec<Payload>>
where
    F: FnMut(usize) -> Vec<u8>,
{
    fs::create_dir_all(dir)?;

    let mut payloads = Vec::with_capacity(PAYLOAD_SIZES.len());
    for &(name, size) in PAYLOAD_SIZES.iter() {
        let path = dir.join(name);
        let data = if path.exists() {
            debug!(path = %path.display(), "reusing fixture");
            fs::read(&path)?
        } else {
            info!(path = %path.display(), size, "generating fixture");
            let data = random_bytes(size);
            fs::write(&path, &data)?;
            data
        };

        payloads.push(Payload {
            name: name.to_string(),
            data,
        });
    }

    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::FlipType;
    use tempfile::tempdir;

    #[test]
    fn avalanche_csv_format() {
        let records = vec![
            AvalancheRecord {
                trial: 1,
                flip_type: FlipType::Plaintext,
                key_size_bits: 128,
                avalanche_percent: 50.0,
            },
            AvalancheRecord {
                trial: 2,
                flip_type: FlipType::Key,
                key_size_bits: 256,
                avalanche_percent: 48.828125,
            },
        ];

        let mut out = Vec::new();
        write_avalanche_csv(&mut out, &records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "trial,type,key_size_bits,avalanche_percent\n\
             1,plaintext,128,50.0000\n\
             2,key,256,48.8281\n"
        );
    }

    #[test]
    fn performance_csv_format() {
        let records = vec![PerformanceRecord {
            file_name: "pt_1KB.bin".to_string(),
            file_size_bytes: 1024,
            key_size_bits: 192,
            avg_enc_time_ms: 0.012345,
            avg_dec_time_ms: 1.5,
            runs: 10,
        }];

        let mut out = Vec::new();
        write_performance_csv(&mut out, &records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "file_name,file_size_bytes,key_size_bits,avg_enc_time_ms,avg_dec_time_ms,runs\n\
             pt_1KB.bin,1024,192,0.0123,1.5000,10\n"
        );
    }

    #[test]
    fn write_results_skips_empty_sets() {
        let tmp = tempdir().unwrap();
        // Not created yet, so write_results has to make it
        let dir = tmp.path().join("results");
        let results = RunResults {
            avalanche: vec![AvalancheRecord {
                trial: 1,
                flip_type: FlipType::Key,
                key_size_bits: 128,
                avalanche_percent: 51.25,
            }],
            performance: Vec::new(),
        };

        let written = write_results(&dir, &results).unwrap();
        assert_eq!(written, vec![dir.join(AVALANCHE_CSV)]);
        assert!(!dir.join(PERFORMANCE_CSV).exists());

        let text = fs::read_to_string(dir.join(AVALANCHE_CSV)).unwrap();
        assert_eq!(text.lines().nth(1), Some("1,key,128,51.2500"));
    }

    #[test]
    fn fixtures_are_created_then_reused() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("plaintexts");

        let mut calls = 0;
        let first = load_or_create_payloads(&dir, |len| {
            calls += 1;
            vec![0xA5; len]
        })
        .unwrap();
        assert_eq!(calls, 4);
        assert_eq!(first[3].name, "pt_1MB.bin");
        assert_eq!(first[3].data.len(), 1024 * 1024);

        let second = load_or_create_payloads(&dir, |_| panic!("fixture regenerated")).unwrap();
        assert_eq!(first, second);
        assert!(dir.join("pt_1KB.bin").is_file());
    }
}
