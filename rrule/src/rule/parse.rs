// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parser for the `KEY=VALUE;...` rule text.

use std::str::FromStr;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use lexical::FromLexical;

use crate::error::RRuleError;
use crate::keyword::{
    KW_RRULE, KW_RRULE_BYDAY, KW_RRULE_BYEASTER, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE,
    KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS,
    KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_DTSTART, KW_RRULE_FREQ,
    KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST, KW_TZID,
};

const KW_DATE_TIME: &str = "DATE-TIME";
use crate::rule::{Frequency, RuleDateTime, RuleOptions, WeekDay, WeekDayNum};

impl FromStr for RuleOptions {
    type Err = RRuleError;

    /// Parses and validates a rule such as `FREQ=MONTHLY;INTERVAL=2;BYDAY=-1FR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let src = s.trim();
        if src.is_empty() {
            return Err(RRuleError::invalid(KW_RRULE, "empty rule"));
        }

        let mut parts = Parts::default();
        for part in src.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(RRuleError::invalid(
                    part,
                    "expected a KEY=VALUE rule part",
                ));
            };

            match key {
                KW_RRULE_FREQ => set_once(&mut parts.freq, key, value.parse()?)?,
                KW_RRULE_DTSTART => {
                    set_once(&mut parts.dtstart, key, parse_rule_datetime(key, value, false)?)?;
                }
                KW_RRULE_INTERVAL => set_once(&mut parts.interval, key, parse_number(key, value)?)?,
                KW_RRULE_WKST => set_once(&mut parts.wkst, key, parse_weekday(key, value)?)?,
                KW_RRULE_COUNT => set_once(&mut parts.count, key, parse_number(key, value)?)?,
                KW_RRULE_UNTIL => {
                    set_once(&mut parts.until, key, parse_rule_datetime(key, value, true)?)?;
                }
                KW_RRULE_BYSETPOS => set_once(&mut parts.by_set_pos, key, parse_list(key, value)?)?,
                KW_RRULE_BYMONTH => set_once(&mut parts.by_month, key, parse_list(key, value)?)?,
                KW_RRULE_BYMONTHDAY => {
                    set_once(&mut parts.by_month_day, key, parse_list(key, value)?)?;
                }
                KW_RRULE_BYYEARDAY => {
                    set_once(&mut parts.by_year_day, key, parse_list(key, value)?)?;
                }
                KW_RRULE_BYWEEKNO => set_once(&mut parts.by_week_no, key, parse_list(key, value)?)?,
                KW_RRULE_BYDAY => set_once(&mut parts.by_day, key, parse_weekday_list(key, value)?)?,
                KW_RRULE_BYHOUR => set_once(&mut parts.by_hour, key, parse_list(key, value)?)?,
                KW_RRULE_BYMINUTE => set_once(&mut parts.by_minute, key, parse_list(key, value)?)?,
                KW_RRULE_BYSECOND => set_once(&mut parts.by_second, key, parse_list(key, value)?)?,
                KW_RRULE_BYEASTER => set_once(&mut parts.by_easter, key, parse_list(key, value)?)?,
                _ => return Err(RRuleError::invalid(key, "unknown rule part")),
            }
        }

        let options = parts.build()?;
        options.validate()?;
        Ok(options)
    }
}

impl FromStr for RuleDateTime {
    type Err = RRuleError;

    /// Parses any of the [`RuleDateTime`] forms, including a bare date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule_datetime(KW_DATE_TIME, s, true)
    }
}

/// Rule parts seen so far, each at most once.
#[derive(Default)]
struct Parts {
    freq: Option<Frequency>,
    dtstart: Option<RuleDateTime>,
    interval: Option<u32>,
    wkst: Option<WeekDay>,
    count: Option<u32>,
    until: Option<RuleDateTime>,
    by_set_pos: Option<Vec<i32>>,
    by_month: Option<Vec<i32>>,
    by_month_day: Option<Vec<i32>>,
    by_year_day: Option<Vec<i32>>,
    by_week_no: Option<Vec<i32>>,
    by_day: Option<Vec<WeekDayNum>>,
    by_hour: Option<Vec<i32>>,
    by_minute: Option<Vec<i32>>,
    by_second: Option<Vec<i32>>,
    by_easter: Option<Vec<i32>>,
}

impl Parts {
    fn build(self) -> Result<RuleOptions, RRuleError> {
        let freq = self
            .freq
            .ok_or_else(|| RRuleError::invalid(KW_RRULE_FREQ, "missing required rule part"))?;

        Ok(RuleOptions {
            freq,
            dtstart: self.dtstart,
            interval: self.interval,
            wkst: self.wkst,
            count: self.count,
            until: self.until,
            by_set_pos: self.by_set_pos.unwrap_or_default(),
            by_month: self.by_month.unwrap_or_default(),
            by_month_day: self.by_month_day.unwrap_or_default(),
            by_year_day: self.by_year_day.unwrap_or_default(),
            by_week_no: self.by_week_no.unwrap_or_default(),
            by_day: self.by_day.unwrap_or_default(),
            by_hour: self.by_hour.unwrap_or_default(),
            by_minute: self.by_minute.unwrap_or_default(),
            by_second: self.by_second.unwrap_or_default(),
            by_easter: self.by_easter.unwrap_or_default(),
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), RRuleError> {
    if slot.is_some() {
        return Err(RRuleError::invalid(key, "rule part given more than once"));
    }
    *slot = Some(value);
    Ok(())
}

/// An unsigned decimal number.
fn parse_number<N: FromLexical>(key: &str, token: &str) -> Result<N, RRuleError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RRuleError::invalid(
            key,
            format!("expected a number, found '{token}'"),
        ));
    }
    lexical::parse(token)
        .map_err(|err| RRuleError::invalid(key, format!("invalid number '{token}': {err}")))
}

/// A decimal integer with an optional `+` or `-` sign.
fn parse_integer(key: &str, token: &str) -> Result<i32, RRuleError> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let n: i32 = parse_number(key, digits)
        .map_err(|_| RRuleError::invalid(key, format!("expected an integer, found '{token}'")))?;
    Ok(if negative { -n } else { n })
}

fn parse_list(key: &str, value: &str) -> Result<Vec<i32>, RRuleError> {
    value.split(',').map(|token| parse_integer(key, token)).collect()
}

fn parse_weekday(key: &str, code: &str) -> Result<WeekDay, RRuleError> {
    WeekDay::from_code(code)
        .ok_or_else(|| RRuleError::invalid(key, format!("unknown weekday '{code}'")))
}

fn parse_weekday_list(key: &str, value: &str) -> Result<Vec<WeekDayNum>, RRuleError> {
    value
        .split(',')
        .map(|token| parse_weekday_num(key, token))
        .collect()
}

/// `[+|-]ordinal` followed by a two letter weekday code, e.g. `MO`, `+2FR`, `-1SU`.
fn parse_weekday_num(key: &str, token: &str) -> Result<WeekDayNum, RRuleError> {
    let split = token.len().checked_sub(2).filter(|&i| token.is_char_boundary(i));
    let Some(split) = split else {
        return Err(RRuleError::invalid(
            key,
            format!("expected a weekday, found '{token}'"),
        ));
    };

    let (ordinal, code) = token.split_at(split);
    let day = parse_weekday(key, code)?;
    let occurrence = if ordinal.is_empty() {
        None
    } else {
        Some(parse_integer(key, ordinal)?)
    };
    Ok(WeekDayNum {
        occurrence,
        plus_sign: ordinal.starts_with('+'),
        day,
    })
}

/// A `DTSTART` or `UNTIL` value; see [`RuleDateTime`] for the accepted forms.
fn parse_rule_datetime(key: &str, value: &str, allow_date: bool) -> Result<RuleDateTime, RRuleError> {
    if let Some(rest) = value.strip_prefix(KW_TZID).and_then(|s| s.strip_prefix('=')) {
        let Some((tzid, stamp)) = rest.split_once(':') else {
            return Err(RRuleError::invalid(
                key,
                format!("expected TZID=<zone>:<date-time>, found '{value}'"),
            ));
        };
        if tzid.is_empty() {
            return Err(RRuleError::invalid(key, "empty time zone identifier"));
        }

        let tz = TimeZone::get(tzid)
            .map_err(|err| RRuleError::invalid(key, format!("unknown time zone '{tzid}': {err}")))?;
        let zdt = parse_datetime(key, stamp)?
            .to_zoned(tz)
            .map_err(|err| RRuleError::invalid(key, err.to_string()))?;
        return Ok(RuleDateTime::Zoned(zdt));
    }

    if let Some(stamp) = value.strip_suffix('Z') {
        return Ok(RuleDateTime::Utc(parse_datetime(key, stamp)?));
    }

    if allow_date && value.len() == 8 {
        return Ok(RuleDateTime::Date(parse_date(key, value)?));
    }

    Ok(RuleDateTime::Floating(parse_datetime(key, value)?))
}

/// `YYYYMMDD`
fn parse_date(key: &str, s: &str) -> Result<Date, RRuleError> {
    if s.len() != 8 {
        return Err(RRuleError::invalid(
            key,
            format!("expected YYYYMMDD, found '{s}'"),
        ));
    }

    let year = field(key, s, 0..4)?;
    let month = field(key, s, 4..6)?;
    let day = field(key, s, 6..8)?;
    Date::new(year, month, day).map_err(|err| RRuleError::invalid(key, err.to_string()))
}

/// `YYYYMMDDTHHMMSS`
fn parse_datetime(key: &str, s: &str) -> Result<DateTime, RRuleError> {
    let (Some(date), Some("T"), Some(time)) = (s.get(..8), s.get(8..9), s.get(9..)) else {
        return Err(RRuleError::invalid(
            key,
            format!("expected YYYYMMDDTHHMMSS, found '{s}'"),
        ));
    };
    if time.len() != 6 {
        return Err(RRuleError::invalid(
            key,
            format!("expected YYYYMMDDTHHMMSS, found '{s}'"),
        ));
    }

    let date = parse_date(key, date)?;
    let hour = field(key, time, 0..2)?;
    let minute = field(key, time, 2..4)?;
    let second = field(key, time, 4..6)?;
    let time = jiff::civil::Time::new(hour, minute, second, 0)
        .map_err(|err| RRuleError::invalid(key, err.to_string()))?;
    Ok(date.to_datetime(time))
}

fn field<N: FromLexical>(key: &str, s: &str, range: std::ops::Range<usize>) -> Result<N, RRuleError> {
    let token = s
        .get(range)
        .ok_or_else(|| RRuleError::invalid(key, format!("truncated value '{s}'")))?;
    parse_number(key, token)
}
