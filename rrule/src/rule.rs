// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rules, RFC 5545 Section 3.3.10.
//!
//! A [`RecurrenceRule`] keeps the structured parts it was built from, so it
//! serializes back to the same text, and the [`TemporalExpression`] it was
//! compiled into for one concrete occurrence window.

mod compile;
mod parse;

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::Zoned;
use jiff::civil::{Date, DateTime, Weekday};
use jiff::tz::TimeZone;

use crate::error::RRuleError;
use crate::expr::TemporalExpression;
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYEASTER, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH,
    KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_DTSTART, KW_RRULE_FREQ, KW_RRULE_FREQ_DAILY,
    KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY,
    KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL,
    KW_RRULE_UNTIL, KW_RRULE_WKST, KW_TZID,
};

pub use crate::rule::compile::compile;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Secondly => write!(f, "{KW_RRULE_FREQ_SECONDLY}"),
            Frequency::Minutely => write!(f, "{KW_RRULE_FREQ_MINUTELY}"),
            Frequency::Hourly => write!(f, "{KW_RRULE_FREQ_HOURLY}"),
            Frequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            Frequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            Frequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            Frequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

impl FromStr for Frequency {
    type Err = RRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KW_RRULE_FREQ_SECONDLY => Ok(Frequency::Secondly),
            KW_RRULE_FREQ_MINUTELY => Ok(Frequency::Minutely),
            KW_RRULE_FREQ_HOURLY => Ok(Frequency::Hourly),
            KW_RRULE_FREQ_DAILY => Ok(Frequency::Daily),
            KW_RRULE_FREQ_WEEKLY => Ok(Frequency::Weekly),
            KW_RRULE_FREQ_MONTHLY => Ok(Frequency::Monthly),
            KW_RRULE_FREQ_YEARLY => Ok(Frequency::Yearly),
            _ => Err(RRuleError::invalid(
                KW_RRULE_FREQ,
                format!("unknown frequency '{s}'"),
            )),
        }
    }
}

/// Day of the week, as written in `BYDAY` and `WKST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum WeekDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekDay {
    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            KW_DAY_SU => Some(WeekDay::Sunday),
            KW_DAY_MO => Some(WeekDay::Monday),
            KW_DAY_TU => Some(WeekDay::Tuesday),
            KW_DAY_WE => Some(WeekDay::Wednesday),
            KW_DAY_TH => Some(WeekDay::Thursday),
            KW_DAY_FR => Some(WeekDay::Friday),
            KW_DAY_SA => Some(WeekDay::Saturday),
            _ => None,
        }
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekDay::Sunday => write!(f, "{KW_DAY_SU}"),
            WeekDay::Monday => write!(f, "{KW_DAY_MO}"),
            WeekDay::Tuesday => write!(f, "{KW_DAY_TU}"),
            WeekDay::Wednesday => write!(f, "{KW_DAY_WE}"),
            WeekDay::Thursday => write!(f, "{KW_DAY_TH}"),
            WeekDay::Friday => write!(f, "{KW_DAY_FR}"),
            WeekDay::Saturday => write!(f, "{KW_DAY_SA}"),
        }
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Sunday => Weekday::Sunday,
            WeekDay::Monday => Weekday::Monday,
            WeekDay::Tuesday => Weekday::Tuesday,
            WeekDay::Wednesday => Weekday::Wednesday,
            WeekDay::Thursday => Weekday::Thursday,
            WeekDay::Friday => Weekday::Friday,
            WeekDay::Saturday => Weekday::Saturday,
        }
    }
}

/// A `BYDAY` entry: a weekday with an optional signed ordinal, e.g. `+2FR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDayNum {
    /// Ordinal of the weekday within the period, 1-53 in magnitude.
    pub occurrence: Option<i32>,

    /// Whether a positive ordinal is written with a leading `+`, so that
    /// `2FR` and `+2FR` both serialize as they were given.
    pub plus_sign: bool,

    /// The weekday.
    pub day: WeekDay,
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occurrence {
            Some(n) if n > 0 && self.plus_sign => write!(f, "+{n}{}", self.day),
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

/// A `DTSTART` or `UNTIL` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDateTime {
    /// Local time without a zone, `19970714T133000`.
    Floating(DateTime),

    /// UTC time, `19970714T173000Z`.
    Utc(DateTime),

    /// Local time in a named zone, `TZID=America/New_York:19970714T133000`.
    Zoned(Zoned),

    /// A whole day, `19970714`. Only accepted for `UNTIL`.
    Date(Date),
}

impl RuleDateTime {
    /// The calendar day of this value as seen from `tz`. Floating values and
    /// plain dates are read as local to `tz`.
    ///
    /// # Errors
    ///
    /// Fails when a UTC value is outside the range jiff supports.
    pub fn date_in(&self, tz: &TimeZone) -> Result<Date, jiff::Error> {
        match self {
            RuleDateTime::Floating(dt) => Ok(dt.date()),
            RuleDateTime::Utc(dt) => Ok(dt.to_zoned(TimeZone::UTC)?.with_time_zone(tz.clone()).date()),
            RuleDateTime::Zoned(zdt) => Ok(zdt.with_time_zone(tz.clone()).date()),
            RuleDateTime::Date(date) => Ok(*date),
        }
    }

    /// The instant this value denotes, seen from `tz`. Floating values and
    /// plain dates are read as local to `tz`, a plain date at its first
    /// instant.
    ///
    /// # Errors
    ///
    /// Fails when the value is outside the range jiff supports in `tz`.
    pub fn to_zoned(&self, tz: &TimeZone) -> Result<Zoned, jiff::Error> {
        match self {
            RuleDateTime::Floating(dt) => dt.to_zoned(tz.clone()),
            RuleDateTime::Utc(dt) => Ok(dt.to_zoned(TimeZone::UTC)?.with_time_zone(tz.clone())),
            RuleDateTime::Zoned(zdt) => Ok(zdt.with_time_zone(tz.clone())),
            RuleDateTime::Date(date) => date.to_zoned(tz.clone()),
        }
    }

    /// Returns true for a plain date.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, RuleDateTime::Date(_))
    }
}

impl Display for RuleDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDateTime::Floating(dt) => write_datetime(f, *dt),
            RuleDateTime::Utc(dt) => {
                write_datetime(f, *dt)?;
                write!(f, "Z")
            }
            RuleDateTime::Zoned(zdt) => match zdt.time_zone().iana_name() {
                Some(name) => {
                    write!(f, "{KW_TZID}={name}:")?;
                    write_datetime(f, zdt.datetime())
                }
                None => {
                    write_datetime(f, zdt.with_time_zone(TimeZone::UTC).datetime())?;
                    write!(f, "Z")
                }
            },
            RuleDateTime::Date(date) => write_date(f, *date),
        }
    }
}

fn write_date(f: &mut fmt::Formatter<'_>, date: Date) -> fmt::Result {
    write!(f, "{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

fn write_datetime(f: &mut fmt::Formatter<'_>, dt: DateTime) -> fmt::Result {
    write_date(f, dt.date())?;
    write!(f, "T{:02}{:02}{:02}", dt.hour(), dt.minute(), dt.second())
}

/// The structured parts of a recurrence rule.
///
/// Optional parts stay `None` (or empty) when they were not given, so the
/// rule serializes back to exactly the parts it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// `FREQ`, the only required part.
    pub freq: Frequency,
    /// `DTSTART`.
    pub dtstart: Option<RuleDateTime>,
    /// `INTERVAL`, 1 when absent.
    pub interval: Option<u32>,
    /// `WKST`.
    pub wkst: Option<WeekDay>,
    /// `COUNT`, unbounded when absent or 0.
    pub count: Option<u32>,
    /// `UNTIL`.
    pub until: Option<RuleDateTime>,
    /// `BYSETPOS`.
    pub by_set_pos: Vec<i32>,
    /// `BYMONTH`.
    pub by_month: Vec<i32>,
    /// `BYMONTHDAY`.
    pub by_month_day: Vec<i32>,
    /// `BYYEARDAY`.
    pub by_year_day: Vec<i32>,
    /// `BYWEEKNO`.
    pub by_week_no: Vec<i32>,
    /// `BYDAY`.
    pub by_day: Vec<WeekDayNum>,
    /// `BYHOUR`.
    pub by_hour: Vec<i32>,
    /// `BYMINUTE`.
    pub by_minute: Vec<i32>,
    /// `BYSECOND`.
    pub by_second: Vec<i32>,
    /// `BYEASTER`, days relative to Easter Sunday.
    pub by_easter: Vec<i32>,
}

impl RuleOptions {
    /// Options with only a frequency set.
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            dtstart: None,
            interval: None,
            wkst: None,
            count: None,
            until: None,
            by_set_pos: Vec::new(),
            by_month: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_day: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
            by_second: Vec::new(),
            by_easter: Vec::new(),
        }
    }

    /// Checks every part against the bounds of RFC 5545.
    ///
    /// # Errors
    ///
    /// Returns [`RRuleError::Validation`] naming the first offending part.
    pub fn validate(&self) -> Result<(), RRuleError> {
        if self.interval == Some(0) {
            return Err(RRuleError::invalid(
                KW_RRULE_INTERVAL,
                "must be greater than 0",
            ));
        }

        check_bounds(KW_RRULE_BYSECOND, &self.by_second, 0, 59, false)?;
        check_bounds(KW_RRULE_BYMINUTE, &self.by_minute, 0, 59, false)?;
        check_bounds(KW_RRULE_BYHOUR, &self.by_hour, 0, 23, false)?;
        check_bounds(KW_RRULE_BYMONTHDAY, &self.by_month_day, 1, 31, true)?;
        check_bounds(KW_RRULE_BYYEARDAY, &self.by_year_day, 1, 366, true)?;
        check_bounds(KW_RRULE_BYWEEKNO, &self.by_week_no, 1, 53, true)?;
        check_bounds(KW_RRULE_BYMONTH, &self.by_month, 1, 12, false)?;
        check_bounds(KW_RRULE_BYSETPOS, &self.by_set_pos, 1, 366, true)?;

        let ordinals: Vec<i32> = self.by_day.iter().filter_map(|d| d.occurrence).collect();
        check_bounds(KW_RRULE_BYDAY, &ordinals, 1, 53, true)
    }

    /// `INTERVAL` with its default applied.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval.unwrap_or(1)
    }

    /// `COUNT` with its default applied, 0 is unbounded.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(0)
    }
}

fn check_bounds(
    field: &str,
    values: &[i32],
    min: i32,
    max: i32,
    signed: bool,
) -> Result<(), RRuleError> {
    for &value in values {
        let positive = (min..=max).contains(&value);
        let negative = signed && (-max..=-min).contains(&value);
        if !positive && !negative {
            let range = if signed {
                format!("{min}..={max} or -{max}..=-{min}")
            } else {
                format!("{min}..={max}")
            };
            return Err(RRuleError::invalid(
                field,
                format!("{value} is not in {range}"),
            ));
        }
    }
    Ok(())
}

impl Display for RuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;
        if let Some(dtstart) = &self.dtstart {
            write!(f, ";{KW_RRULE_DTSTART}={dtstart}")?;
        }
        if let Some(interval) = self.interval {
            write!(f, ";{KW_RRULE_INTERVAL}={interval}")?;
        }
        if let Some(wkst) = self.wkst {
            write!(f, ";{KW_RRULE_WKST}={wkst}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        if let Some(until) = &self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        }
        write_list(f, KW_RRULE_BYSETPOS, &self.by_set_pos)?;
        write_list(f, KW_RRULE_BYMONTH, &self.by_month)?;
        write_list(f, KW_RRULE_BYMONTHDAY, &self.by_month_day)?;
        write_list(f, KW_RRULE_BYYEARDAY, &self.by_year_day)?;
        write_list(f, KW_RRULE_BYWEEKNO, &self.by_week_no)?;
        write_list(f, KW_RRULE_BYDAY, &self.by_day)?;
        write_list(f, KW_RRULE_BYHOUR, &self.by_hour)?;
        write_list(f, KW_RRULE_BYMINUTE, &self.by_minute)?;
        write_list(f, KW_RRULE_BYSECOND, &self.by_second)?;
        write_list(f, KW_RRULE_BYEASTER, &self.by_easter)
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, key: &str, values: &[T]) -> fmt::Result {
    let Some((first, rest)) = values.split_first() else {
        return Ok(());
    };
    write!(f, ";{key}={first}")?;
    for value in rest {
        write!(f, ",{value}")?;
    }
    Ok(())
}

/// A validated recurrence rule together with its compiled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    options: RuleOptions,
    compiled: TemporalExpression,
}

impl RecurrenceRule {
    /// Validates `options` and wraps them into an uncompiled rule.
    ///
    /// # Errors
    ///
    /// Returns [`RRuleError::Validation`] when a part is out of bounds.
    pub fn new(options: RuleOptions) -> Result<Self, RRuleError> {
        options.validate()?;
        Ok(Self {
            options,
            compiled: TemporalExpression::Never,
        })
    }

    /// The structured parts the rule was built from.
    #[must_use]
    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// The rule's frequency.
    #[must_use]
    pub fn freq(&self) -> Frequency {
        self.options.freq
    }

    /// Compiles the rule for the occurrence running from `start` to `end` and
    /// keeps the result. On failure the compiled expression is reset to
    /// [`TemporalExpression::Never`].
    ///
    /// # Errors
    ///
    /// See [`compile`].
    pub fn compile(&mut self, start: &Zoned, end: &Zoned) -> Result<&TemporalExpression, RRuleError> {
        match compile(&self.options, start, end) {
            Ok(expr) => {
                self.compiled = expr;
                Ok(&self.compiled)
            }
            Err(err) => {
                self.compiled = TemporalExpression::Never;
                Err(err)
            }
        }
    }

    /// The compiled expression, [`TemporalExpression::Never`] until a
    /// successful [`Self::compile`].
    #[must_use]
    pub fn compiled(&self) -> &TemporalExpression {
        &self.compiled
    }

    /// Returns true when the compiled expression includes the instant's day.
    #[must_use]
    pub fn includes(&self, zdt: &Zoned) -> bool {
        self.compiled.includes(zdt)
    }

    /// Consumes the rule, returning the compiled expression.
    #[must_use]
    pub fn into_compiled(self) -> TemporalExpression {
        self.compiled
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.options, f)
    }
}

impl FromStr for RecurrenceRule {
    type Err = RRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn week_day_num_keeps_explicit_sign() {
        let plus = WeekDayNum {
            occurrence: Some(2),
            plus_sign: true,
            day: WeekDay::Friday,
        };
        let unsigned = WeekDayNum {
            plus_sign: false,
            ..plus
        };
        let minus = WeekDayNum {
            occurrence: Some(-1),
            plus_sign: false,
            day: WeekDay::Monday,
        };
        let bare = WeekDayNum {
            occurrence: None,
            plus_sign: false,
            day: WeekDay::Sunday,
        };
        assert_eq!(plus.to_string(), "+2FR");
        assert_eq!(unsigned.to_string(), "2FR");
        assert_eq!(minus.to_string(), "-1MO");
        assert_eq!(bare.to_string(), "SU");
    }

    #[test]
    fn week_day_maps_to_jiff() {
        assert_eq!(Weekday::from(WeekDay::Sunday), Weekday::Sunday);
        assert_eq!(Weekday::from(WeekDay::Thursday), Weekday::Thursday);
    }

    #[test]
    fn options_defaults() {
        let options = RuleOptions::new(Frequency::Daily);
        assert_eq!(options.interval(), 1);
        assert_eq!(options.count(), 0);
        assert_eq!(options.to_string(), "FREQ=DAILY");
    }

    #[test]
    fn validate_rejects_out_of_bounds_parts() {
        let cases: [(&str, fn(&mut RuleOptions)); 9] = [
            ("INTERVAL", |o| o.interval = Some(0)),
            ("BYSECOND", |o| o.by_second = vec![60]),
            ("BYMINUTE", |o| o.by_minute = vec![-1]),
            ("BYHOUR", |o| o.by_hour = vec![24]),
            ("BYMONTHDAY", |o| o.by_month_day = vec![0]),
            ("BYYEARDAY", |o| o.by_year_day = vec![-367]),
            ("BYWEEKNO", |o| o.by_week_no = vec![54]),
            ("BYMONTH", |o| o.by_month = vec![13]),
            ("BYDAY", |o| {
                o.by_day = vec![WeekDayNum {
                    occurrence: Some(54),
                    plus_sign: false,
                    day: WeekDay::Monday,
                }];
            }),
        ];
        for (field, mutate) in cases {
            let mut options = RuleOptions::new(Frequency::Monthly);
            mutate(&mut options);
            let err = RecurrenceRule::new(options).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn validate_accepts_negative_signed_parts() {
        let mut options = RuleOptions::new(Frequency::Yearly);
        options.by_month_day = vec![-31, -1, 1, 31];
        options.by_year_day = vec![-366, 366];
        options.by_week_no = vec![-53, 53];
        options.by_set_pos = vec![-1];
        assert!(RecurrenceRule::new(options).is_ok());
    }

    #[test]
    fn new_rule_is_uncompiled() {
        let rule = RecurrenceRule::new(RuleOptions::new(Frequency::Daily)).unwrap();
        assert_eq!(rule.compiled(), &TemporalExpression::Never);
        let zdt = date(2024, 1, 1).at(0, 0, 0, 0).in_tz("UTC").unwrap();
        assert!(!rule.includes(&zdt));
    }

    #[test]
    fn rule_datetime_display() {
        let dt = date(1997, 7, 14).at(13, 30, 0, 0);
        assert_eq!(RuleDateTime::Floating(dt).to_string(), "19970714T133000");
        assert_eq!(RuleDateTime::Utc(dt).to_string(), "19970714T133000Z");
        assert_eq!(RuleDateTime::Date(dt.date()).to_string(), "19970714");

        let zdt = dt.in_tz("America/New_York").unwrap();
        assert_eq!(
            RuleDateTime::Zoned(zdt).to_string(),
            "TZID=America/New_York:19970714T133000"
        );
    }

    #[test]
    fn rule_datetime_day_in_zone() {
        let tz = TimeZone::get("Asia/Shanghai").unwrap();
        let late = RuleDateTime::Utc(date(2024, 1, 1).at(20, 0, 0, 0));
        assert_eq!(late.date_in(&tz).unwrap(), date(2024, 1, 2));

        let floating = RuleDateTime::Floating(date(2024, 1, 1).at(20, 0, 0, 0));
        assert_eq!(floating.date_in(&tz).unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn rule_datetime_to_zoned() {
        let tz = TimeZone::get("Asia/Shanghai").unwrap();
        let utc = RuleDateTime::Utc(date(2024, 1, 1).at(20, 0, 0, 0));
        let zdt = utc.to_zoned(&tz).unwrap();
        assert_eq!(zdt.datetime(), date(2024, 1, 2).at(4, 0, 0, 0));

        let day = RuleDateTime::Date(date(2024, 1, 1));
        assert!(day.is_date());
        assert_eq!(day.to_zoned(&tz).unwrap().datetime(), date(2024, 1, 1).at(0, 0, 0, 0));
    }
}
