//! Time series normalization.
//!
//! Contract:
//! - every cost must be finite and non-negative (rejected with the caller's index)
//! - output is sorted ascending by date; ties keep their input order
//! - `costs[i]` and `dates[i]` always describe the same observation
//!
//! Fewer than two observations is *not* an error at this layer. Callers decide
//! whether a short series means "no forecast" or a hard failure.

use crate::domain::{GapPolicy, Observation};
use crate::error::{ForecastError, Result};
use crate::series::calendar::{add_months, months_between};

/// A validated, date-sorted series with index-aligned arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub observations: Vec<Observation>,
    pub costs: Vec<f64>,
    pub dates: Vec<chrono::NaiveDate>,
    /// Number of synthetic months inserted by `GapPolicy::Interpolate`.
    pub interpolated: usize,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Validate and sort observations.
pub fn normalize(observations: &[Observation], gaps: GapPolicy) -> Result<NormalizedSeries> {
    for (index, obs) in observations.iter().enumerate() {
        if !(obs.cost.is_finite() && obs.cost >= 0.0) {
            return Err(ForecastError::InvalidObservation {
                index,
                cost: obs.cost,
            });
        }
    }

    let mut sorted = observations.to_vec();
    // `sort_by_key` is stable, which keeps duplicate dates deterministic.
    sorted.sort_by_key(|o| o.date);

    let (sorted, interpolated) = match gaps {
        GapPolicy::Keep => (sorted, 0),
        GapPolicy::Interpolate => fill_month_gaps(&sorted),
    };

    let costs = sorted.iter().map(|o| o.cost).collect();
    let dates = sorted.iter().map(|o| o.date).collect();

    Ok(NormalizedSeries {
        observations: sorted,
        costs,
        dates,
        interpolated,
    })
}

/// Insert one linearly interpolated observation per missing calendar month.
///
/// Input must already be sorted. Observations sharing a month are untouched.
fn fill_month_gaps(sorted: &[Observation]) -> (Vec<Observation>, usize) {
    let mut out = Vec::with_capacity(sorted.len());
    let mut inserted = 0;

    for (i, obs) in sorted.iter().enumerate() {
        if i > 0 {
            let prev = sorted[i - 1];
            let gap = months_between(prev.date, obs.date);
            for m in 1..gap {
                let Some(date) = u32::try_from(m).ok().and_then(|m| add_months(prev.date, m)) else {
                    break;
                };
                let u = m as f64 / gap as f64;
                out.push(Observation::new(date, prev.cost + u * (obs.cost - prev.cost)));
                inserted += 1;
            }
        }
        out.push(*obs);
    }

    if inserted > 0 {
        tracing::debug!(inserted, "interpolated missing months");
    }

    (out, inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(y: i32, m: u32, cost: f64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), cost)
    }

    #[test]
    fn sorts_and_aligns_arrays() {
        let input = vec![obs(2023, 3, 120.0), obs(2023, 1, 100.0), obs(2023, 2, 110.0)];
        let s = normalize(&input, GapPolicy::Keep).unwrap();
        assert_eq!(s.costs, vec![100.0, 110.0, 120.0]);
        assert_eq!(s.dates[0], NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(s.dates[2], NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(s.interpolated, 0);
    }

    #[test]
    fn duplicate_dates_keep_input_order() {
        let input = vec![obs(2023, 2, 5.0), obs(2023, 1, 1.0), obs(2023, 2, 3.0), obs(2023, 2, 4.0)];
        let s = normalize(&input, GapPolicy::Keep).unwrap();
        assert_eq!(s.costs, vec![1.0, 5.0, 3.0, 4.0]);
    }

    #[test]
    fn rejects_negative_and_non_finite_costs() {
        let input = vec![obs(2023, 1, 100.0), obs(2023, 2, -1.0)];
        assert_eq!(
            normalize(&input, GapPolicy::Keep),
            Err(ForecastError::InvalidObservation { index: 1, cost: -1.0 })
        );

        let input = vec![obs(2023, 1, f64::INFINITY)];
        assert!(matches!(
            normalize(&input, GapPolicy::Keep),
            Err(ForecastError::InvalidObservation { index: 0, .. })
        ));

        let input = vec![obs(2023, 1, 1.0), obs(2023, 1, 2.0), obs(2023, 1, f64::NAN)];
        assert!(matches!(
            normalize(&input, GapPolicy::Keep),
            Err(ForecastError::InvalidObservation { index: 2, .. })
        ));
    }

    #[test]
    fn empty_and_single_inputs_are_accepted() {
        assert!(normalize(&[], GapPolicy::Keep).unwrap().is_empty());
        assert_eq!(normalize(&[obs(2023, 1, 1.0)], GapPolicy::Keep).unwrap().len(), 1);
    }

    #[test]
    fn interpolates_missing_months() {
        let input = vec![obs(2023, 1, 100.0), obs(2023, 4, 130.0), obs(2023, 5, 140.0)];
        let s = normalize(&input, GapPolicy::Interpolate).unwrap();
        assert_eq!(s.interpolated, 2);
        assert_eq!(s.len(), 5);
        assert_eq!(s.dates[1], NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(s.dates[2], NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert!((s.costs[1] - 110.0).abs() < 1e-9);
        assert!((s.costs[2] - 120.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_leaves_same_month_observations_alone() {
        let input = vec![obs(2023, 1, 100.0), obs(2023, 1, 102.0), obs(2023, 2, 104.0)];
        let s = normalize(&input, GapPolicy::Interpolate).unwrap();
        assert_eq!(s.interpolated, 0);
        assert_eq!(s.costs, vec![100.0, 102.0, 104.0]);
    }
}
