use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the first day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// A calendar month, held as its first day. Construction normalizes any date
/// within the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetMonth(NaiveDate);

impl TargetMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self(first_day_of_month(date))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// UTC instant at the start of the month. Everything committed for the
    /// month is stamped with this instant.
    pub fn start_instant(&self) -> DateTime<Utc> {
        start_of_day_utc(self.0)
    }

    pub fn next(&self) -> Self {
        Self(add_months(self.0, 1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        same_calendar_month(self.0, date)
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// Adds `months` calendar months, clamping the day when the target month is
/// shorter (chrono `Months` semantics).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Subtracts `months` calendar months, clamping the day when needed.
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// True when both dates fall in the same calendar month of the same year.
pub fn same_calendar_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Converts a domain date to the UTC instant at the start of that day.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Enumerates every month that still needs a rebalance, in chronological
/// order, up to and including the month of `today`.
///
/// The month of `last_rebalance` itself is considered done. With no prior
/// rebalance, one month before `today` is used as the baseline, so exactly
/// the current month is returned.
pub fn missed_target_months(
    last_rebalance: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<TargetMonth> {
    let baseline = last_rebalance.unwrap_or_else(|| sub_months(today, 1));
    let end = TargetMonth::of(today);

    let mut months = Vec::new();
    let mut current = TargetMonth::of(baseline).next();
    while current <= end {
        months.push(current);
        current = current.next();
    }
    months
}
