// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Forward searches for the days a temporal expression includes.

use jiff::civil::Date;

use crate::expr::TemporalExpression;

/// The first day on or after `from` that `expr` includes, looking at most
/// `horizon_days` days ahead.
#[must_use]
pub fn next_occurrence(from: Date, expr: &TemporalExpression, horizon_days: u32) -> Option<Date> {
    days_from(from)
        .take(horizon_days as usize)
        .find(|&day| expr.includes_date(day))
}

/// Up to `n` successive days on or after `from` that `expr` includes, all
/// within `horizon_days` days of `from`.
#[must_use]
pub fn next_n(from: Date, expr: &TemporalExpression, n: usize, horizon_days: u32) -> Vec<Date> {
    days_from(from)
        .take(horizon_days as usize)
        .filter(|&day| expr.includes_date(day))
        .take(n)
        .collect()
}

/// `from`, the day after, and so on until the end of the supported range.
fn days_from(from: Date) -> impl Iterator<Item = Date> {
    std::iter::successors(Some(from), |day| day.tomorrow().ok())
}
