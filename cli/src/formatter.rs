// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use almanac_core::{Event, EventStatus};
use colored::Colorize;
use jiff::{civil::Date, tz::TimeZone};

/// Renders the events of one day, one line each.
#[derive(Debug)]
pub struct EventFormatter {
    date: Date,
    tz: TimeZone,
}

impl EventFormatter {
    pub fn new(date: Date, tz: TimeZone) -> Self {
        Self { date, tz }
    }

    pub fn format<'a>(&'a self, events: &'a [&'a Event]) -> Display<'a> {
        Display {
            events,
            formatter: self,
        }
    }

    /// `HH:MM-HH:MM` within the day. A bound of a one-off event that falls
    /// on another day shows as `..`; a recurring event shows the time slot
    /// of its occurrences.
    fn time_range(&self, event: &Event) -> String {
        if event.whole_day {
            return "all day".to_owned();
        }

        let start = event.start.with_time_zone(self.tz.clone());
        let end = event.end.with_time_zone(self.tz.clone());
        if event.is_recurring() {
            return format!("{}-{}", start.strftime("%H:%M"), end.strftime("%H:%M"));
        }

        let start = if start.date() == self.date {
            start.strftime("%H:%M").to_string()
        } else {
            "..".to_owned()
        };
        let end = if end.date() == self.date {
            end.strftime("%H:%M").to_string()
        } else {
            "..".to_owned()
        };
        format!("{start}-{end}")
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    events: &'a [&'a Event],
    formatter: &'a EventFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in self.events {
            let range = format!("{:<11}", self.formatter.time_range(event));
            let summary = match event.status {
                Some(EventStatus::Cancelled) => event.summary.strikethrough(),
                _ => event.summary.normal(),
            };
            write!(f, "{} {}", range.cyan(), summary)?;
            if event.is_recurring() {
                write!(f, " {}", "(recurring)".dimmed())?;
            }
            writeln!(f, " {}", format!("[{}]", event.display_id()).dimmed())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn event(id: &str, start: &str, end: &str) -> Event {
        Event::new(id, start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn formats_time_slots() {
        colored::control::set_override(false);
        let standup = event("s", "2024-06-16T09:00[UTC]", "2024-06-16T09:15[UTC]")
            .with_summary("Standup")
            .with_rrule("FREQ=DAILY")
            .with_imported_id("standup@example.com");
        let formatter = EventFormatter::new(date(2024, 6, 16), TimeZone::UTC);
        let out = formatter.format(&[&standup]).to_string();
        assert_eq!(
            out,
            "09:00-09:15 Standup (recurring) [standup@example.com]\n"
        );
    }

    #[test]
    fn recurring_events_keep_their_slot_on_later_days() {
        colored::control::set_override(false);
        let standup = event("s", "2024-06-16T09:00[UTC]", "2024-06-16T10:00[UTC]")
            .with_summary("Standup")
            .with_rrule("FREQ=DAILY");
        let formatter = EventFormatter::new(date(2024, 6, 20), TimeZone::UTC);
        let out = formatter.format(&[&standup]).to_string();
        assert_eq!(out, "09:00-10:00 Standup (recurring) [s]\n");
    }

    #[test]
    fn formats_whole_and_spanning_days() {
        colored::control::set_override(false);
        let offsite = event("o", "2024-06-20T00:00[UTC]", "2024-06-22T00:00[UTC]")
            .with_summary("Offsite");
        let night = event("n", "2024-06-20T22:00[UTC]", "2024-06-21T02:00[UTC]")
            .with_summary("Night shift");

        let formatter = EventFormatter::new(date(2024, 6, 21), TimeZone::UTC);
        let out = formatter.format(&[&offsite, &night]).to_string();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "all day     Offsite [o]");
        assert_eq!(lines[1], "..-02:00    Night shift [n]");
    }
}
