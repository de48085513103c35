// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{Date, DateTime};

/// The row `date` sits in on a Monday-first calendar of its month, starting at 1.
#[must_use]
pub fn week_of_month(date: Date) -> i8 {
    let offset = date.first_of_month().weekday().to_monday_zero_offset();
    (date.day() - 1 + offset) / 7 + 1
}

/// Minutes elapsed since midnight.
#[must_use]
pub fn minute_of_day(dt: DateTime) -> i32 {
    i32::from(dt.hour()) * 60 + i32::from(dt.minute())
}
