// Copyright 2012 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp;

use crate::harness::{AvalancheRecord, FlipType};

/// Running mean and variance (Welford), plus extremes
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OnlineStats {
    n: usize,
    mean: f64,
    sq_diff: f64,
    min: f64,
    max: f64,
}

impl Default for OnlineStats {
    fn default() -> OnlineStats {
        OnlineStats {
            n: 0,
            mean: 0f64,
            sq_diff: 0f64,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl OnlineStats {
    pub fn push(&mut self, datum: f64) {
        self.n += 1;
        let diff = datum - self.mean;
        self.mean += diff / (self.n as f64);
        self.sq_diff += diff * (datum - self.mean);

        if local_cmp(datum, self.min) == cmp::Ordering::Less {
            self.min = datum;
        }
        if local_cmp(datum, self.max) == cmp::Ordering::Greater {
            self.max = datum;
        }
    }

    pub fn count(&self) -> usize {
        self.n
    }

    /// Zero when nothing has been pushed
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance. Zero for fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.n < 2 {
            0f64
        } else {
            self.sq_diff / ((self.n - 1) as f64)
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        if self.n == 0 {
            0f64
        } else {
            self.min
        }
    }

    pub fn max(&self) -> f64 {
        if self.n == 0 {
            0f64
        } else {
            self.max
        }
    }
}

impl FromIterator<f64> for OnlineStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> OnlineStats {
        let mut stats = OnlineStats::default();
        for x in iter {
            stats.push(x);
        }
        stats
    }
}

// NaNs are smaller than everything
fn local_cmp(x: f64, y: f64) -> cmp::Ordering {
    use std::cmp::Ordering::{Equal, Greater, Less};
    if y.is_nan() {
        Greater
    } else if x.is_nan() || x < y {
        Less
    } else if x == y {
        Equal
    } else {
        Greater
    }
}

/// Helper function: extract a value representing the `pct` percentile of a sorted sample-set,
/// using linear interpolation. If samples are not sorted, return nonsensical value.
fn percentile_of_sorted(sorted_samples: &[f64], pct: f64) -> f64 {
    assert!(!sorted_samples.is_empty());
    if sorted_samples.len() == 1 {
        return sorted_samples[0];
    }
    assert!((0f64..=100f64).contains(&pct));
    let length = (sorted_samples.len() - 1) as f64;
    let rank = (pct / 100f64) * length;
    let lrank = rank.floor();
    let d = rank - lrank;
    let n = lrank as usize;
    let lo = sorted_samples[n];
    if n + 1 == sorted_samples.len() {
        return lo;
    }
    let hi = sorted_samples[n + 1];
    lo + (hi - lo) * d
}

/// Descriptive statistics over the trials of one avalanche experiment
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AvalancheSummary {
    pub flip_type: FlipType,
    pub key_size_bits: usize,
    pub trials: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl AvalancheSummary {
    /// Summarizes `records`, which should all come from one experiment. Returns `None` if there
    /// are no records.
    pub fn from_records(records: &[AvalancheRecord]) -> Option<AvalancheSummary> {
        let first = records.first()?;

        let stats: OnlineStats = records.iter().map(|r| r.avalanche_percent).collect();
        let mut sorted: Vec<f64> = records.iter().map(|r| r.avalanche_percent).collect();
        sorted.sort_by(|&x, &y| local_cmp(x, y));

        Some(AvalancheSummary {
            flip_type: first.flip_type,
            key_size_bits: first.key_size_bits,
            trials: stats.count(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            median: percentile_of_sorted(&sorted, 50f64),
            min: stats.min(),
            max: stats.max(),
        })
    }

    /// Distance of the mean from the ideal 50%, in percentage points
    pub fn deviation_from_ideal(&self) -> f64 {
        (self.mean - 50f64).abs()
    }

    pub fn fmt(&self) -> String {
        let &AvalancheSummary {
            trials,
            mean,
            std_dev,
            median,
            min,
            max,
            ..
        } = self;
        format!(
            "n == {}, mean = {:.4}% (off 50% by {:.4}), std = {:.4}, median = {:.4}%, \
             range = [{:.4}, {:.4}]",
            trials,
            mean,
            self.deviation_from_ideal(),
            std_dev,
            median,
            min,
            max
        )
    }
}
