// Copyright 2012-2016 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io;
use std::io::prelude::*;
use std::iter::repeat;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{CryptoRng, RngCore};
use tracing::{info, warn};

use crate::error::Result;
use crate::harness::{
    AvalancheRecord, Harness, Payload, PerformanceRecord, DEFAULT_RUNS, DEFAULT_TRIALS,
};
use crate::keys::KeySize;
use crate::report;
use crate::stats::AvalancheSummary;

/// The display name of one experiment unit, e.g. `avalanche/key/aes192`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentName(pub String);

impl ExperimentName {
    fn padded(&self, column_count: usize) -> String {
        let mut name = self.0.clone();
        let fill = column_count.saturating_sub(name.len());
        let pad = repeat(" ").take(fill).collect::<String>();
        name.push_str(&pad);

        name
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One independent unit of work. Performance units refer to a payload by its index in the
/// payload list given to the runner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Experiment {
    PlaintextAvalanche(KeySize),
    KeyAvalanche(KeySize),
    Performance { payload: usize, key_size: KeySize },
}

impl Experiment {
    pub fn name(&self, payloads: &[Payload]) -> ExperimentName {
        let s = match *self {
            Experiment::PlaintextAvalanche(ks) => format!("avalanche/plaintext/{}", ks),
            Experiment::KeyAvalanche(ks) => format!("avalanche/key/{}", ks),
            Experiment::Performance { payload, key_size } => {
                let file = payloads.get(payload).map_or("?", |p| p.name.as_str());
                format!("performance/{}/{}", file, key_size)
            }
        };
        ExperimentName(s)
    }
}

/// Experiment options.
///
/// When `filter` is set, only experiments whose names contain the filter string as a substring
/// are run. When `stop` is set, the runner checks it before every experiment and returns what it
/// has collected so far once it reads `true`.
#[derive(Clone, Debug)]
pub struct RunOpts {
    pub filter: Option<String>,
    pub trials: usize,
    pub runs: usize,
    pub key_sizes: Vec<KeySize>,
    pub seed: Option<u64>,
    pub results_dir: Option<PathBuf>,
    pub plaintext_dir: Option<PathBuf>,
    pub skip_avalanche: bool,
    pub skip_performance: bool,
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for RunOpts {
    fn default() -> RunOpts {
        RunOpts {
            filter: None,
            trials: DEFAULT_TRIALS,
            runs: DEFAULT_RUNS,
            key_sizes: KeySize::ALL.to_vec(),
            seed: None,
            results_dir: None,
            plaintext_dir: None,
            skip_avalanche: false,
            skip_performance: false,
            stop: None,
        }
    }
}

impl RunOpts {
    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }
}

/// What the runner reports as it goes
#[derive(Clone, Debug)]
pub enum ExperimentEvent {
    Begin(Vec<ExperimentName>),
    Wait(ExperimentName),
    Avalanche(ExperimentName, AvalancheSummary),
    Performance(ExperimentName, PerformanceRecord),
    Interrupted { completed: usize, total: usize },
}

/// Every record produced by a run, in run order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunResults {
    pub avalanche: Vec<AvalancheRecord>,
    pub performance: Vec<PerformanceRecord>,
}

/// Lays out the driving loop: both avalanche families per key size, then every payload under
/// every key size. Avalanche units are left out when `opts.trials` is zero, since they would
/// produce nothing to summarize.
pub fn plan_experiments(opts: &RunOpts, payloads: &[Payload]) -> Vec<Experiment> {
    let mut plan = Vec::new();

    if !opts.skip_avalanche && opts.trials > 0 {
        for &ks in &opts.key_sizes {
            plan.push(Experiment::PlaintextAvalanche(ks));
            plan.push(Experiment::KeyAvalanche(ks));
        }
    }

    if !opts.skip_performance {
        for payload in 0..payloads.len() {
            for &key_size in &opts.key_sizes {
                plan.push(Experiment::Performance { payload, key_size });
            }
        }
    }

    plan
}

fn filter_experiments(
    filter: &Option<String>,
    plan: Vec<Experiment>,
    payloads: &[Payload],
) -> Vec<Experiment> {
    match *filter {
        None => plan,
        Some(ref filter) => plan
            .into_iter()
            .filter(|e| e.name(payloads).0.contains(&filter[..]))
            .collect(),
    }
}

/// Runs every planned experiment that passes the filter, handing events to `callback`.
///
/// Any experiment error aborts the whole run.
pub fn run_experiments<C, F>(
    opts: &RunOpts,
    harness: &mut Harness<C>,
    payloads: &[Payload],
    mut callback: F,
) -> Result<RunResults>
where
    C: RngCore + CryptoRng,
    F: FnMut(ExperimentEvent) -> io::Result<()>,
{
    use self::ExperimentEvent::*;

    let plan = filter_experiments(&opts.filter, plan_experiments(opts, payloads), payloads);
    let names: Vec<ExperimentName> = plan.iter().map(|e| e.name(payloads)).collect();
    let total = plan.len();

    if total == 0 {
        if let Some(ref f) = opts.filter {
            warn!(filter = %f, "no experiment matches the filter");
        }
    }

    callback(Begin(names.clone()))?;

    let mut results = RunResults::default();
    for (completed, (exp, name)) in plan.into_iter().zip(names).enumerate() {
        if opts.stop_requested() {
            warn!(completed, total, "stop requested, skipping remaining experiments");
            callback(Interrupted { completed, total })?;
            break;
        }

        callback(Wait(name.clone()))?;
        let records = match exp {
            Experiment::PlaintextAvalanche(ks) => harness.plaintext_avalanche(opts.trials, ks)?,
            Experiment::KeyAvalanche(ks) => harness.key_avalanche(opts.trials, ks)?,
            Experiment::Performance { payload, key_size } => {
                let rec = harness.performance(&payloads[payload], key_size, opts.runs)?;
                callback(Performance(name, rec.clone()))?;
                results.performance.push(rec);
                continue;
            }
        };

        if let Some(summ) = AvalancheSummary::from_records(&records) {
            callback(Avalanche(name, summ))?;
        }
        results.avalanche.extend(records);
    }

    Ok(results)
}

struct ConsoleRunState<W> {
    out: W,
    max_name_len: usize, // Number of columns to fill when aligning names
}

impl<W: Write> ConsoleRunState<W> {
    fn write_plain(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.flush()
    }

    fn write_experiment_start(&mut self, name: &ExperimentName) -> io::Result<()> {
        let name = name.padded(self.max_name_len);
        self.write_plain(&format!("experiment {} ... ", name))
    }

    fn write_run_start(&mut self, len: usize) -> io::Result<()> {
        let noun = if len != 1 { "experiments" } else { "experiment" };
        self.write_plain(&format!("\nrunning {} {}\n", len, noun))
    }

    fn write_avalanche(&mut self, summ: &AvalancheSummary) -> io::Result<()> {
        self.write_plain(&format!(": {}\n", summ.fmt()))
    }

    fn write_performance(&mut self, rec: &PerformanceRecord) -> io::Result<()> {
        self.write_plain(&format!(
            ": {} bytes, enc = {:.4} ms, dec = {:.4} ms, runs = {}\n",
            rec.file_size_bytes, rec.avg_enc_time_ms, rec.avg_dec_time_ms, rec.runs
        ))
    }

    fn write_interrupted(&mut self, completed: usize, total: usize) -> io::Result<()> {
        self.write_plain(&format!(
            "\ninterrupted after {} of {} experiments\n",
            completed, total
        ))
    }

    fn write_run_finish(&mut self) -> io::Result<()> {
        self.write_plain("\nexperiments complete\n\n")
    }

    fn handle(&mut self, event: &ExperimentEvent) -> io::Result<()> {
        match *event {
            ExperimentEvent::Begin(ref names) => self.write_run_start(names.len()),
            ExperimentEvent::Wait(ref name) => self.write_experiment_start(name),
            ExperimentEvent::Avalanche(_, ref summ) => self.write_avalanche(summ),
            ExperimentEvent::Performance(_, ref rec) => self.write_performance(rec),
            ExperimentEvent::Interrupted { completed, total } => {
                self.write_interrupted(completed, total)
            }
        }
    }
}

/// Runs the experiments selected by `opts`, prints progress to stdout, and writes the CSV
/// files into `opts.results_dir` when it is set.
///
/// Keys and IVs come from the OS. Payloads are read from (or generated into)
/// `opts.plaintext_dir` when it is set, and generated in memory otherwise.
pub fn run_experiments_console(opts: &RunOpts) -> Result<RunResults> {
    let mut harness = Harness::new(opts.seed);

    let payloads = if opts.skip_performance {
        Vec::new()
    } else {
        match opts.plaintext_dir {
            Some(ref dir) => report::load_or_create_payloads(dir, |len| harness.random_bytes(len))?,
            None => harness.standard_payloads(),
        }
    };

    let mut st = ConsoleRunState {
        out: io::stdout(),
        max_name_len: 0,
    };
    st.max_name_len = plan_experiments(opts, &payloads)
        .iter()
        .map(|e| e.name(&payloads).0.len())
        .max()
        .unwrap_or(0);

    let results = run_experiments(opts, &mut harness, &payloads, |ev| st.handle(&ev))?;
    st.write_run_finish()?;

    if let Some(ref dir) = opts.results_dir {
        for path in report::write_results(dir, &results)? {
            info!(path = %path.display(), "results saved");
        }
    }

    Ok(results)
}
