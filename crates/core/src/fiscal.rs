//! Fiscal year resolution from calendar dates.
//!
//! The fiscal year begins in July. A date in July or later belongs to the
//! fiscal year starting that July; earlier dates belong to the fiscal year
//! that started the previous July. Labels take the form
//! `"<startYear>-<endYear two digits>"`, e.g. `"2025-26"`.
//!
//! Callers must supply a date already in the intended local calendar; no
//! timezone normalization happens here.

use chrono::{Datelike, NaiveDate};

/// First calendar month of the fiscal year (July).
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

/// Returns the fiscal-year label for a calendar date.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use finboard_core::fiscal::fiscal_year_label;
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
/// assert_eq!(fiscal_year_label(date), "2025-26");
/// ```
#[must_use]
pub fn fiscal_year_label(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= FISCAL_YEAR_START_MONTH {
        format!("{}-{:02}", year, (year + 1) % 100)
    } else {
        format!("{}-{:02}", year - 1, year % 100)
    }
}
