// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;
use jiff::{ToSpan, Zoned};

use crate::error::RRuleError;
use crate::expr::{Cadence, Period, TemporalExpression};
use crate::keyword::KW_RRULE_UNTIL;
use crate::rule::{Frequency, RuleOptions};

/// Longest occurrence, in days, that is expanded into per-day cadences.
const MAX_OCCURRENCE_DAYS: i64 = 366;

/// Compiles `options` into a temporal expression for the occurrence running
/// from `start` to `end`.
///
/// The expression matches the days on or after `start` that fall on a cadence
/// boundary of the rule's frequency, interval and count. An occurrence that
/// spans several days matches every one of those days on each boundary, and
/// yearly rules are further gated to the month/day window of the occurrence.
/// `UNTIL`, when given, excludes every day after it. Both bounds are
/// evaluated in the zone of `start`.
///
/// # Errors
///
/// - [`RRuleError::UnsupportedFrequency`] for weekly and finer frequencies.
/// - [`RRuleError::Validation`] when `UNTIL` cannot be placed in the zone of
///   `start`.
pub fn compile(
    options: &RuleOptions,
    start: &Zoned,
    end: &Zoned,
) -> Result<TemporalExpression, RRuleError> {
    let period = match options.freq {
        Frequency::Yearly => Period::Year,
        Frequency::Monthly => Period::Month,
        Frequency::Daily => Period::Day,
        freq => return Err(RRuleError::UnsupportedFrequency(freq)),
    };

    let tz = start.time_zone();
    let first = start.date();
    let last = end.with_time_zone(tz.clone()).date();

    let mut ee = vec![
        TemporalExpression::after_date(first, true),
        occurrence_cadence(period, first, last, options.interval(), options.count()),
    ];
    if period == Period::Year {
        ee.push(TemporalExpression::date_range(first, last));
    }
    if let Some(until) = &options.until {
        let day = until
            .date_in(tz)
            .map_err(|err| RRuleError::invalid(KW_RRULE_UNTIL, err.to_string()))?;
        ee.push(TemporalExpression::before_date(day.saturating_add(1.day())));
    }

    tracing::debug!(freq = %options.freq, %first, %last, "compiled recurrence rule");
    Ok(TemporalExpression::And(ee))
}

/// The cadence of the occurrence's first day, lasting as many days as the
/// occurrence does.
fn occurrence_cadence(
    period: Period,
    first: Date,
    last: Date,
    interval: u32,
    count: u32,
) -> TemporalExpression {
    let cadence = TemporalExpression::Cadence(Cadence::new(period, first, interval, count));
    let span = (last.duration_since(first).as_hours() / 24).clamp(0, MAX_OCCURRENCE_DAYS);
    match u16::try_from(span) {
        Ok(0) | Err(_) => cadence,
        Ok(days) => TemporalExpression::lasting(cadence, days),
    }
}
