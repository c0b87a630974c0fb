//! Additive monthly seasonal profile.
//!
//! Each calendar month's factor is the mean detrended residual of the
//! observations falling in that month. Months never observed get `0`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::trend::TrendModel;

/// Twelve additive adjustments indexed by `month0` (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub factors: [f64; 12],
}

impl SeasonalProfile {
    /// Adjustment for the calendar month of `date`.
    pub fn adjustment(&self, date: NaiveDate) -> f64 {
        self.factors[date.month0() as usize]
    }
}

/// Build the profile from `costs`/`dates` detrended by `trend`.
///
/// `costs` and `dates` must be index-aligned; extra entries in the longer
/// slice are ignored.
pub fn decompose(costs: &[f64], dates: &[NaiveDate], trend: &TrendModel) -> SeasonalProfile {
    let mut sums = [0.0; 12];
    let mut counts = [0usize; 12];

    for (i, (&cost, date)) in costs.iter().zip(dates).enumerate() {
        let month = date.month0() as usize;
        sums[month] += cost - trend.value_at(i as f64);
        counts[month] += 1;
    }

    let mut factors = [0.0; 12];
    for m in 0..12 {
        if counts[m] > 0 {
            factors[m] = sums[m] / counts[m] as f64;
        }
    }

    SeasonalProfile { factors }
}
