// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use almanac_core::{Calendar, Event};
use jiff::Zoned;
use jiff::civil::Date;
use jiff::tz::TimeZone;

/// A calendar in UTC.
#[must_use]
pub fn test_calendar() -> Calendar {
    Calendar::new(TimeZone::UTC)
}

/// The instant `hour:00` UTC on `date`.
#[must_use]
pub fn utc(date: Date, hour: i8) -> Zoned {
    date.at(hour, 0, 0, 0).in_tz("UTC").unwrap()
}

/// An event named after its identifier.
#[must_use]
pub fn test_event(id: &str, start: Zoned, end: Zoned, rrule: &str) -> Event {
    Event::new(id, start, end)
        .with_rrule(rrule)
        .with_summary(format!("Event {id}"))
}

/// A calendar with a one-off, a multi-day, a whole-day, two recurring
/// events and one recurring event that cannot be compiled.
pub const SAMPLE_ICS: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Almanac//Tests//EN\r
X-WR-CALNAME:Team\r
X-WR-CALDESC:Shared team calendar\\, mostly meetings\r
X-WR-TIMEZONE:Europe/Berlin\r
BEGIN:VTIMEZONE\r
TZID:Europe/Berlin\r
BEGIN:STANDARD\r
DTSTART:19701025T030000\r
TZOFFSETFROM:+0200\r
TZOFFSETTO:+0100\r
END:STANDARD\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
UID:standup@example.com\r
SUMMARY:Standup\r
DTSTART;TZID=Europe/Berlin:20240603T093000\r
DTEND;TZID=Europe/Berlin:20240603T094500\r
RRULE:FREQ=DAILY;COUNT=4\r
STATUS:CONFIRMED\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:review@example.com\r
SUMMARY:Review\r
DESCRIPTION:Quarterly review.\\nBring the\r
  numbers.\r
LOCATION:Room 4\\, second floor\r
DTSTART:20240616T060000Z\r
DTEND:20240616T070000Z\r
STATUS:TENTATIVE\r
BEGIN:VALARM\r
ACTION:DISPLAY\r
DESCRIPTION:Reminder\r
TRIGGER:-PT15M\r
END:VALARM\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:offsite@example.com\r
SUMMARY:Offsite\r
DTSTART;VALUE=DATE:20240620\r
DTEND;VALUE=DATE:20240622\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:rent@example.com\r
SUMMARY:Pay rent\r
DTSTART;TZID=Europe/Berlin:20240101T080000\r
DURATION:PT30M\r
RRULE:FREQ=MONTHLY\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:gym@example.com\r
SUMMARY:Gym\r
DTSTART;TZID=Europe/Berlin:20240603T180000\r
DTEND;TZID=Europe/Berlin:20240603T190000\r
RRULE:FREQ=WEEKLY;BYDAY=MO,TH\r
END:VEVENT\r
END:VCALENDAR\r
";
