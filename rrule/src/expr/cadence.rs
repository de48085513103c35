// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use jiff::civil::Date;

/// The unit a [`Cadence`] counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

/// Every `interval` periods from `anchor`, optionally limited to `count`
/// intervals.
///
/// A date is on a boundary when a whole number of periods separates it from
/// the anchor: any multiple of 1 day, 7 days, the same day of the month, or
/// the same month and day of the year. Months and years are counted in their
/// own units rather than elapsed days, so a boundary month that lacks the
/// anchor's day (the 31st, February 29th) has no boundary date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cadence {
    /// Unit of the cadence.
    pub period: Period,

    /// First boundary.
    pub anchor: Date,

    /// Periods between two boundaries, treated as 1 when zero.
    pub interval: u32,

    /// Number of intervals after the anchor that still match; 0 is unbounded.
    pub count: u32,
}

impl Cadence {
    /// Creates a new cadence.
    #[must_use]
    pub fn new(period: Period, anchor: Date, interval: u32, count: u32) -> Self {
        Self {
            period,
            anchor,
            interval,
            count,
        }
    }

    /// Whole periods between the anchor and `date`, or `None` when `date`
    /// precedes the anchor or does not sit on a period boundary.
    #[must_use]
    pub fn elapsed(&self, date: Date) -> Option<i64> {
        let anchor = self.anchor;
        match self.period {
            Period::Day => {
                let days = elapsed_days(anchor, date);
                (days >= 0).then_some(days)
            }
            Period::Week => {
                let days = elapsed_days(anchor, date);
                (days >= 0 && days % 7 == 0).then_some(days / 7)
            }
            Period::Month => {
                let months = i64::from(date.year() - anchor.year()) * 12
                    + i64::from(date.month() - anchor.month());
                (months >= 0 && date.day() == anchor.day()).then_some(months)
            }
            Period::Year => {
                let years = i64::from(date.year() - anchor.year());
                let same_day = date.month() == anchor.month() && date.day() == anchor.day();
                (years >= 0 && same_day).then_some(years)
            }
        }
    }

    /// Returns true when `date` is a boundary and, for a bounded cadence, the
    /// number of intervals so far does not exceed `count`.
    #[must_use]
    pub fn includes(&self, date: Date) -> bool {
        let Some(elapsed) = self.elapsed(date) else {
            return false;
        };

        let interval = i64::from(self.interval.max(1));
        if elapsed % interval != 0 {
            return false;
        }

        let so_far = (elapsed + interval - 1) / interval;
        self.count == 0 || so_far <= i64::from(self.count)
    }
}

fn elapsed_days(from: Date, to: Date) -> i64 {
    to.duration_since(from).as_hours() / 24
}
