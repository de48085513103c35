// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporal expressions: composable predicates over calendar dates.
//!
//! A [`TemporalExpression`] answers one question, "does this date belong to
//! the set?". Leaves match on a single calendar feature (weekday, day of
//! month, month, …) and the `And` / `Or` / `Not` combinators build trees out
//! of them. Evaluation is pure: the result only depends on the expression and
//! the civil date-time of the queried instant in its own time zone.

mod cadence;
mod util;

use std::ops;

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::{ToSpan, Zoned};

pub use crate::expr::cadence::{Cadence, Period};
pub use crate::expr::util::{minute_of_day, week_of_month};

/// A predicate over calendar dates.
///
/// The default value is [`TemporalExpression::Never`], the state of a rule
/// that has not been compiled (or failed to compile).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemporalExpression {
    /// Matches every date.
    Always,

    /// Matches no date.
    #[default]
    Never,

    /// Matches a single day of the week.
    Weekday(Weekday),

    /// Matches the weekdays between `start` and `end` inclusive, compared by
    /// ISO number (Monday = 1). There is no wraparound across Sunday.
    WeekdayRange {
        /// First weekday of the range.
        start: Weekday,
        /// Last weekday of the range.
        end: Weekday,
    },

    /// Matches a day of the month, 1-based; negative values count back from
    /// the end of the queried month (`-1` is the last day).
    DayOfMonth(i8),

    /// Matches the days of the month between two [`Self::DayOfMonth`] values,
    /// each normalized against the queried month.
    DayRange {
        /// First day, may be negative.
        start: i8,
        /// Last day, may be negative.
        end: i8,
    },

    /// Matches a week of the month (rows of a Monday-first month calendar,
    /// starting at 1); negative values count back from the last week.
    WeekInMonth(i8),

    /// Matches a month, 1-12.
    Month(i8),

    /// Matches the months between `start` and `end` inclusive.
    MonthRange {
        /// First month.
        start: i8,
        /// Last month.
        end: i8,
    },

    /// Matches a single year.
    Year(i16),

    /// Matches the years between `start` and `end` inclusive.
    YearRange {
        /// First year.
        start: i16,
        /// Last year.
        end: i16,
    },

    /// Matches exactly one calendar date.
    Date(Date),

    /// Matches a year-agnostic month/day window, bounds inclusive.
    DateRange {
        /// Month the window opens in.
        start_month: i8,
        /// Day the window opens on.
        start_day: i8,
        /// Month the window closes in.
        end_month: i8,
        /// Day the window closes on.
        end_day: i8,
    },

    /// Matches the days strictly before the given day.
    BeforeDate(Date),

    /// Matches the days strictly after the given day.
    AfterDate(Date),

    /// Matches a time-of-day window in minutes since midnight, `start <= m < end`.
    DayTime {
        /// First minute of the window.
        start: i32,
        /// First minute after the window.
        end: i32,
    },

    /// Matches the boundaries of a periodic cadence.
    Cadence(Cadence),

    /// Matches each day `start` matches and the `days` days after it, the
    /// days an occurrence beginning on a `start` day covers. `start` is
    /// evaluated at day granularity.
    Lasting {
        /// Days an occurrence begins on.
        start: Box<TemporalExpression>,
        /// Days an occurrence lasts beyond the day it begins on.
        days: u16,
    },

    /// Matches when every sub-expression matches; empty matches everything.
    And(Vec<TemporalExpression>),

    /// Matches when any sub-expression matches; empty matches nothing.
    Or(Vec<TemporalExpression>),

    /// Matches when the sub-expression does not.
    Not(Box<TemporalExpression>),
}

impl TemporalExpression {
    /// Returns true when the instant's calendar day (in its own time zone)
    /// belongs to this expression.
    #[must_use]
    pub fn includes(&self, zdt: &Zoned) -> bool {
        self.includes_datetime(zdt.datetime())
    }

    /// Returns true when midnight of `date` belongs to this expression.
    #[must_use]
    pub fn includes_date(&self, date: Date) -> bool {
        self.includes_datetime(date.to_datetime(Time::midnight()))
    }

    /// Returns true when the civil date-time belongs to this expression.
    #[must_use]
    pub fn includes_datetime(&self, dt: DateTime) -> bool {
        let date = dt.date();
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Weekday(weekday) => date.weekday() == *weekday,
            Self::WeekdayRange { start, end } => {
                let n = date.weekday().to_monday_one_offset();
                start.to_monday_one_offset() <= n && n <= end.to_monday_one_offset()
            }
            Self::DayOfMonth(day) => normalize_day(*day, date) == date.day(),
            Self::DayRange { start, end } => {
                normalize_day(*start, date) <= date.day() && date.day() <= normalize_day(*end, date)
            }
            Self::WeekInMonth(week) => week_of_month(date) == normalize_week(*week, date),
            Self::Month(month) => date.month() == *month,
            Self::MonthRange { start, end } => *start <= date.month() && date.month() <= *end,
            Self::Year(year) => date.year() == *year,
            Self::YearRange { start, end } => *start <= date.year() && date.year() <= *end,
            Self::Date(d) => date == *d,
            Self::DateRange {
                start_month,
                start_day,
                end_month,
                end_day,
            } => {
                let (m, d) = (date.month(), date.day());
                if m == *start_month && m == *end_month {
                    *start_day <= d && d <= *end_day
                } else if *start_month < m && m < *end_month {
                    true
                } else if m == *start_month {
                    d >= *start_day
                } else if m == *end_month {
                    d <= *end_day
                } else {
                    false
                }
            }
            Self::BeforeDate(bound) => date < *bound,
            Self::AfterDate(bound) => date > *bound,
            Self::DayTime { start, end } => {
                let m = minute_of_day(dt);
                *start <= m && m < *end
            }
            Self::Cadence(cadence) => cadence.includes(date),
            Self::Lasting { start, days } => (0..=*days).any(|back| {
                date.checked_sub(i32::from(back).days())
                    .is_ok_and(|begin| start.includes_date(begin))
            }),
            Self::And(ee) => ee.iter().all(|e| e.includes_datetime(dt)),
            Self::Or(ee) => ee.iter().any(|e| e.includes_datetime(dt)),
            Self::Not(e) => !e.includes_datetime(dt),
        }
    }

    /// Days strictly after `date`; with `inclusive` the day of `date` itself
    /// also counts, which is expressed by moving the bound one day back.
    #[must_use]
    pub fn after_date(date: Date, inclusive: bool) -> Self {
        if inclusive {
            Self::AfterDate(date.saturating_sub(1.day()))
        } else {
            Self::AfterDate(date)
        }
    }

    /// Days strictly before `date`.
    #[must_use]
    pub fn before_date(date: Date) -> Self {
        Self::BeforeDate(date)
    }

    /// The year-agnostic month/day window spanned by `start` and `end`.
    #[must_use]
    pub fn date_range(start: Date, end: Date) -> Self {
        Self::DateRange {
            start_month: start.month(),
            start_day: start.day(),
            end_month: end.month(),
            end_day: end.day(),
        }
    }

    /// Days of the month between `start` and `end`, both may be negative.
    #[must_use]
    pub fn day_range(start: i8, end: i8) -> Self {
        Self::DayRange { start, end }
    }

    /// Weekdays between `start` and `end`.
    #[must_use]
    pub fn weekday_range(start: Weekday, end: Weekday) -> Self {
        Self::WeekdayRange { start, end }
    }

    /// Months between `start` and `end`.
    #[must_use]
    pub fn month_range(start: i8, end: i8) -> Self {
        Self::MonthRange { start, end }
    }

    /// Years between `start` and `end`.
    #[must_use]
    pub fn year_range(start: i16, end: i16) -> Self {
        Self::YearRange { start, end }
    }

    /// Every `interval` days from `anchor`, for `count` intervals (0 = forever).
    #[must_use]
    pub fn daily(anchor: Date, interval: u32, count: u32) -> Self {
        Self::Cadence(Cadence::new(Period::Day, anchor, interval, count))
    }

    /// Every `interval` weeks from `anchor`, for `count` intervals (0 = forever).
    #[must_use]
    pub fn weekly(anchor: Date, interval: u32, count: u32) -> Self {
        Self::Cadence(Cadence::new(Period::Week, anchor, interval, count))
    }

    /// Every `interval` months from `anchor`, for `count` intervals (0 = forever).
    #[must_use]
    pub fn monthly(anchor: Date, interval: u32, count: u32) -> Self {
        Self::Cadence(Cadence::new(Period::Month, anchor, interval, count))
    }

    /// Every `interval` years from `anchor`, for `count` intervals (0 = forever).
    #[must_use]
    pub fn yearly(anchor: Date, interval: u32, count: u32) -> Self {
        Self::Cadence(Cadence::new(Period::Year, anchor, interval, count))
    }

    /// The days covered by occurrences that begin on a `start` day and last
    /// `days` more days.
    #[must_use]
    pub fn lasting(start: TemporalExpression, days: u16) -> Self {
        Self::Lasting {
            start: Box::new(start),
            days,
        }
    }

    /// The time-of-day window an event running from `start` to `end` covers.
    #[must_use]
    pub fn day_time(start: DateTime, end: DateTime) -> Self {
        let begin = minute_of_day(start);
        let minutes = end.duration_since(start).as_mins();
        let minutes = i32::try_from(minutes).unwrap_or(if minutes < 0 { i32::MIN } else { i32::MAX });
        Self::DayTime {
            start: begin,
            end: begin.saturating_add(minutes),
        }
    }

    /// Appends `e` to an `Or`, or turns `self` into `Or(self, e)`.
    #[must_use]
    pub fn or(self, e: TemporalExpression) -> Self {
        match self {
            Self::Or(mut ee) => {
                ee.push(e);
                Self::Or(ee)
            }
            other => Self::Or(vec![other, e]),
        }
    }

    /// Appends `e` to an `And`, or turns `self` into `And(self, e)`.
    #[must_use]
    pub fn and(self, e: TemporalExpression) -> Self {
        match self {
            Self::And(mut ee) => {
                ee.push(e);
                Self::And(ee)
            }
            other => Self::And(vec![other, e]),
        }
    }
}

impl ops::Not for TemporalExpression {
    type Output = TemporalExpression;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

/// Combines several expressions with a logical OR.
#[must_use]
pub fn or(ee: impl IntoIterator<Item = TemporalExpression>) -> TemporalExpression {
    TemporalExpression::Or(ee.into_iter().collect())
}

/// Combines several expressions with a logical AND.
#[must_use]
pub fn and(ee: impl IntoIterator<Item = TemporalExpression>) -> TemporalExpression {
    TemporalExpression::And(ee.into_iter().collect())
}

/// Any of the given days of the month.
#[must_use]
pub fn days(days: &[i8]) -> TemporalExpression {
    or(days.iter().copied().map(TemporalExpression::DayOfMonth))
}

/// Any of the given weekdays.
#[must_use]
pub fn weekdays(weekdays: &[Weekday]) -> TemporalExpression {
    or(weekdays.iter().copied().map(TemporalExpression::Weekday))
}

/// Any of the given weeks of the month.
#[must_use]
pub fn weeks_in_month(weeks: &[i8]) -> TemporalExpression {
    or(weeks.iter().copied().map(TemporalExpression::WeekInMonth))
}

/// Any of the given months.
#[must_use]
pub fn months(months: &[i8]) -> TemporalExpression {
    or(months.iter().copied().map(TemporalExpression::Month))
}

/// Any of the given years.
#[must_use]
pub fn years(years: &[i16]) -> TemporalExpression {
    or(years.iter().copied().map(TemporalExpression::Year))
}

/// Any of the given dates.
#[must_use]
pub fn dates(dates: &[Date]) -> TemporalExpression {
    or(dates.iter().copied().map(TemporalExpression::Date))
}

/// Any of the given `(start, end)` minute-of-day windows.
#[must_use]
pub fn day_times(slots: &[(i32, i32)]) -> TemporalExpression {
    or(slots
        .iter()
        .map(|&(start, end)| TemporalExpression::DayTime { start, end }))
}

/// Resolves a possibly negative day of the month against the month of `date`.
fn normalize_day(day: i8, date: Date) -> i8 {
    if day < 0 {
        date.days_in_month() + day + 1
    } else {
        day
    }
}

/// Resolves a possibly negative week of the month against the month of `date`.
fn normalize_week(week: i8, date: Date) -> i8 {
    if week < 0 {
        week_of_month(date.last_of_month()) + week + 1
    } else {
        week
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn empty_combinators_use_their_identity() {
        let day = date(2024, 2, 29);
        assert!(and([]).includes_date(day));
        assert!(!or([]).includes_date(day));
    }

    #[test]
    fn default_is_never() {
        assert_eq!(TemporalExpression::default(), TemporalExpression::Never);
        assert!(!TemporalExpression::default().includes_date(date(2000, 1, 1)));
    }

    #[test]
    fn last_day_of_month_follows_the_queried_month() {
        let last = TemporalExpression::DayOfMonth(-1);
        for (year, month, last_day) in [(2023, 2, 28), (2024, 2, 29), (2024, 4, 30), (2024, 12, 31)] {
            assert!(last.includes_date(date(year, month, last_day)));
            assert!(!last.includes_date(date(year, month, last_day - 1)));
            assert!(!last.includes_date(date(year, month, 1)));
        }
    }

    #[test]
    fn day_range_normalizes_each_end() {
        let last_week = TemporalExpression::day_range(-7, -1);
        assert!(last_week.includes_date(date(2024, 2, 23)));
        assert!(last_week.includes_date(date(2024, 2, 29)));
        assert!(!last_week.includes_date(date(2024, 2, 22)));
        assert!(last_week.includes_date(date(2024, 3, 25)));
        assert!(!last_week.includes_date(date(2024, 3, 24)));
    }

    #[test]
    fn weekday_range_does_not_wrap() {
        let workweek = TemporalExpression::weekday_range(Weekday::Monday, Weekday::Friday);
        assert!(workweek.includes_date(date(2024, 6, 17))); // Monday
        assert!(workweek.includes_date(date(2024, 6, 21))); // Friday
        assert!(!workweek.includes_date(date(2024, 6, 22)));

        let wrapped = TemporalExpression::weekday_range(Weekday::Saturday, Weekday::Monday);
        assert!(!wrapped.includes_date(date(2024, 6, 23)));
    }

    #[test]
    fn week_in_month_counts_from_either_end() {
        // June 2024 starts on a Saturday: rows are 1-2, 3-9, ..., 24-30.
        assert!(TemporalExpression::WeekInMonth(1).includes_date(date(2024, 6, 2)));
        assert!(TemporalExpression::WeekInMonth(2).includes_date(date(2024, 6, 3)));
        assert!(TemporalExpression::WeekInMonth(-1).includes_date(date(2024, 6, 24)));
        assert!(!TemporalExpression::WeekInMonth(-1).includes_date(date(2024, 6, 23)));
    }

    #[test]
    fn date_range_within_one_month_and_across_months() {
        let same = TemporalExpression::DateRange {
            start_month: 3,
            start_day: 10,
            end_month: 3,
            end_day: 12,
        };
        assert!(same.includes_date(date(1999, 3, 11)));
        assert!(!same.includes_date(date(1999, 3, 13)));

        let span = TemporalExpression::date_range(date(2016, 9, 20), date(2016, 11, 5));
        assert!(span.includes_date(date(2030, 9, 20)));
        assert!(span.includes_date(date(2030, 10, 1)));
        assert!(span.includes_date(date(2030, 11, 5)));
        assert!(!span.includes_date(date(2030, 9, 19)));
        assert!(!span.includes_date(date(2030, 11, 6)));
    }

    #[test]
    fn after_and_before_work_at_day_granularity() {
        let bound = date(2024, 6, 16);
        let inclusive = TemporalExpression::after_date(bound, true);
        let exclusive = TemporalExpression::after_date(bound, false);
        let late = bound.at(23, 59, 0, 0);

        assert!(inclusive.includes_datetime(bound.at(0, 0, 0, 0)));
        assert!(!exclusive.includes_datetime(late));
        assert!(exclusive.includes_date(date(2024, 6, 17)));

        let before = TemporalExpression::before_date(bound);
        assert!(before.includes_datetime(date(2024, 6, 15).at(23, 59, 59, 0)));
        assert!(!before.includes_datetime(bound.at(0, 0, 0, 0)));
    }

    #[test]
    fn day_time_window_is_half_open() {
        let start = date(2024, 1, 1).at(9, 30, 0, 0);
        let end = date(2024, 1, 1).at(10, 15, 0, 0);
        let slot = TemporalExpression::day_time(start, end);
        assert_eq!(slot, TemporalExpression::DayTime { start: 570, end: 615 });
        assert!(slot.includes_datetime(date(2025, 5, 5).at(9, 30, 0, 0)));
        assert!(!slot.includes_datetime(date(2025, 5, 5).at(10, 15, 0, 0)));
    }

    #[test]
    fn lasting_extends_each_start_day() {
        let month_end = TemporalExpression::lasting(TemporalExpression::DayOfMonth(-1), 1);
        assert!(month_end.includes_date(date(2024, 2, 29)));
        assert!(month_end.includes_date(date(2024, 3, 1)));
        assert!(!month_end.includes_date(date(2024, 3, 2)));
        assert!(!month_end.includes_date(date(2024, 2, 28)));

        let single = TemporalExpression::lasting(TemporalExpression::Date(date(2024, 1, 1)), 0);
        assert!(single.includes_date(date(2024, 1, 1)));
        assert!(!single.includes_date(date(2024, 1, 2)));
    }

    #[test]
    fn list_helpers_match_any_member() {
        let holidays = dates(&[date(2024, 1, 1), date(2024, 12, 25)]);
        assert!(holidays.includes_date(date(2024, 12, 25)));
        assert!(!holidays.includes_date(date(2024, 12, 24)));

        let first_and_last_weeks = weeks_in_month(&[1, -1]);
        assert!(first_and_last_weeks.includes_date(date(2024, 6, 1)));
        assert!(first_and_last_weeks.includes_date(date(2024, 6, 30)));
        assert!(!first_and_last_weeks.includes_date(date(2024, 6, 12)));

        let office_hours = day_times(&[(540, 720), (780, 1020)]);
        assert!(office_hours.includes_datetime(date(2024, 6, 3).at(9, 0, 0, 0)));
        assert!(!office_hours.includes_datetime(date(2024, 6, 3).at(12, 30, 0, 0)));
        assert!(office_hours.includes_datetime(date(2024, 6, 3).at(16, 59, 0, 0)));
    }

    #[test]
    fn combinators_compose() {
        let first_friday_of_summer = and([
            months(&[6, 7, 8]),
            TemporalExpression::Weekday(Weekday::Friday),
            TemporalExpression::WeekInMonth(1),
        ]);
        assert!(first_friday_of_summer.includes_date(date(2024, 7, 5)));
        assert!(!first_friday_of_summer.includes_date(date(2024, 7, 12)));

        let not_weekend = !weekdays(&[Weekday::Saturday, Weekday::Sunday]);
        assert!(not_weekend.includes_date(date(2024, 7, 5)));
        assert!(!not_weekend.includes_date(date(2024, 7, 6)));

        let grown = TemporalExpression::Year(2020).or(TemporalExpression::Year(2022));
        assert_eq!(grown, years(&[2020, 2022]));
    }
}
