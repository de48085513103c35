// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use almanac_core::Calendar;
use jiff::civil::Date;

/// Asserts the imported identifiers (or identifiers) of the events active on
/// `date`, in query order.
///
/// # Panics
///
/// Panics if the events differ from `expected`.
pub fn assert_ids_on(calendar: &Calendar, date: Date, expected: &[&str]) {
    let ids: Vec<&str> = calendar
        .events_on(date)
        .into_iter()
        .map(almanac_core::Event::display_id)
        .collect();
    assert_eq!(ids, expected, "events on {date}");
}

/// Asserts that the event `id` is active on exactly the days of
/// `first..=last` among `from..=to`.
///
/// # Panics
///
/// Panics on the first day where activity differs.
pub fn assert_active_days(calendar: &Calendar, id: &str, (from, to): (Date, Date), (first, last): (Date, Date)) {
    let mut day = from;
    while day <= to {
        let active = calendar.events_on(day).iter().any(|e| e.id == id);
        assert_eq!(active, first <= day && day <= last, "event {id} on {day}");
        day = day.tomorrow().unwrap();
    }
}
