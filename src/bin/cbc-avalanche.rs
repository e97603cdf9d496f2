// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs the AES-CBC avalanche and throughput experiments and writes
//! `results_avalanche.csv` / `results_performance.csv`.
//!
//! Progress goes to stdout, logs to stderr (`RUST_LOG` takes the usual `target=level` syntax).
//! Ctrl-C stops after the current experiment and still saves what was collected.

#[macro_use]
extern crate clap;
extern crate cbc_avalanche;
extern crate ctrlc;
extern crate tracing;
extern crate tracing_subscriber;

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{App, Arg, ArgMatches};
use tracing::{error, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;

use cbc_avalanche::{run_experiments_console, KeySize, RunOpts};

fn init_tracing() {
    let default = || Targets::new().with_default(LevelFilter::INFO);
    let targets = match env::var("RUST_LOG") {
        Ok(var) => var.parse().unwrap_or_else(|e| {
            eprintln!("ignoring unparsable RUST_LOG: {}", e);
            default()
        }),
        Err(_) => default(),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .with(targets)
        .init();
}

fn parse_opts(matches: &ArgMatches) -> RunOpts {
    let mut opts = RunOpts::default();

    opts.filter = matches.value_of("filter").map(|s| s.to_string());
    if matches.is_present("trials") {
        opts.trials = value_t!(matches, "trials", usize).unwrap_or_else(|e| e.exit());
    }
    if matches.is_present("runs") {
        opts.runs = value_t!(matches, "runs", usize).unwrap_or_else(|e| e.exit());
    }
    if matches.is_present("seed") {
        opts.seed = Some(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()));
    }
    if let Some(bits) = matches.values_of("key-size") {
        let parsed: Result<Vec<KeySize>, String> = bits
            .map(|b| {
                b.parse::<usize>()
                    .map_err(|e| format!("--key-size {}: {}", b, e))
                    .and_then(|n| KeySize::from_bits(n).map_err(|e| e.to_string()))
            })
            .collect();
        match parsed {
            Ok(mut sizes) => {
                sizes.sort();
                sizes.dedup();
                opts.key_sizes = sizes;
            }
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(2);
            }
        }
    }

    opts.results_dir = matches.value_of("results-dir").map(PathBuf::from);
    opts.plaintext_dir = matches.value_of("plaintext-dir").map(PathBuf::from);
    opts.skip_avalanche = matches.is_present("skip-avalanche");
    opts.skip_performance = matches.is_present("skip-performance");

    opts
}

fn main() {
    let matches = App::new("cbc-avalanche")
        .about("Measures the avalanche effect and throughput of AES-CBC")
        .arg_from_usage(
            "--filter [EXPERIMENT] \
             'Only run the experiments whose name contains EXPERIMENT'",
        )
        .arg_from_usage("--trials [N] 'Trials per avalanche experiment (default 50)'")
        .arg_from_usage("--runs [N] 'Timed runs per operation and payload (default 10)'")
        .arg_from_usage(
            "--seed [SEED] \
             'Seeds the plaintext and bit-position generator. Keys and IVs are never seeded'",
        )
        .arg_from_usage("--key-size [BITS]... 'Key sizes to test: 128, 192, 256 (default all)'")
        .arg(
            Arg::from_usage("--results-dir [DIR] 'Directory the CSV files are written to'")
                .default_value("data/results"),
        )
        .arg_from_usage(
            "--plaintext-dir [DIR] \
             'Reads timing fixtures from DIR, generating any that are missing'",
        )
        .arg_from_usage("--skip-avalanche 'Do not run the avalanche experiments'")
        .arg_from_usage("--skip-performance 'Do not run the timing experiments'")
        .get_matches();

    init_tracing();

    let mut opts = parse_opts(&matches);

    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = stop.clone();
    match ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        Ok(()) => opts.stop = Some(stop),
        Err(e) => warn!(error = %e, "could not install Ctrl-C handler"),
    }

    match run_experiments_console(&opts) {
        Ok(results) => info!(
            avalanche = results.avalanche.len(),
            performance = results.performance.len(),
            "done"
        ),
        Err(e) => {
            error!(error = %e, "experiment run failed");
            process::exit(1);
        }
    }
}
