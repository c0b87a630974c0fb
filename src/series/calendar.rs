//! Calendar-month arithmetic.
//!
//! Forecast dates advance by whole calendar months, never by fixed day counts.
//! When the target month is shorter than the source day (e.g. Jan 31 + 1 month)
//! chrono clamps to the last day of the target month.

use chrono::{Datelike, Months, NaiveDate};

/// `date + months` calendar months, or `None` past chrono's supported range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Signed number of calendar-month boundaries from `from` to `to`.
///
/// Only year and month matter: `2023-01-31 → 2023-02-01` is one month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    years * 12 + i64::from(to.month0()) - i64::from(from.month0())
}
