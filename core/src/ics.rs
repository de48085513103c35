// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Loading of iCalendar text: the calendar properties and the `VEVENT`
//! components, everything else is skipped.

use almanac_rrule::RuleDateTime;
use ical::IcalParser;
use ical::parser::ical::component::{IcalCalendar, IcalEvent};
use ical::property::Property;
use jiff::tz::TimeZone;
use jiff::{Span, ToSpan, Zoned};

use crate::calendar::{Calendar, CalendarInfo};
use crate::config::{Config, resolve_time_zone};
use crate::error::CalendarError;
use crate::event::{Event, EventStatus};

const KW_VCALENDAR: &str = "VCALENDAR";
const KW_VEVENT: &str = "VEVENT";

const KW_X_WR_CALNAME: &str = "X-WR-CALNAME";
const KW_X_WR_CALDESC: &str = "X-WR-CALDESC";
const KW_X_WR_TIMEZONE: &str = "X-WR-TIMEZONE";
const KW_VERSION: &str = "VERSION";

const KW_UID: &str = "UID";
const KW_DTSTART: &str = "DTSTART";
const KW_DTEND: &str = "DTEND";
const KW_DURATION: &str = "DURATION";
const KW_RRULE: &str = "RRULE";
const KW_SUMMARY: &str = "SUMMARY";
const KW_DESCRIPTION: &str = "DESCRIPTION";
const KW_LOCATION: &str = "LOCATION";
const KW_STATUS: &str = "STATUS";

const KW_TZID: &str = "TZID";
const KW_VALUE: &str = "VALUE";
const KW_VALUE_DATE: &str = "DATE";

/// The outcome of loading a calendar: the events that could be indexed and
/// the problems found on the way.
#[derive(Debug)]
pub struct LoadReport {
    /// The loaded calendar.
    pub calendar: Calendar,

    /// Problems found while loading, one entry per skipped record or failed
    /// recurrence rule.
    pub errors: Vec<CalendarError>,
}

impl LoadReport {
    /// Returns true when nothing went wrong.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Calendar {
    /// Loads the events of an iCalendar text.
    ///
    /// Day boundaries are computed in the configured zone, else in the zone
    /// named by `X-WR-TIMEZONE`, else in the system zone. A record that
    /// cannot be read is skipped and reported; a recurring event whose rule
    /// does not compile is kept and reported. Text that is not well-formed
    /// iCalendar stops the load at the first malformed `VCALENDAR`. Empty
    /// text loads an empty calendar.
    #[tracing::instrument(skip_all, fields(len = text.len()))]
    pub fn load_str(text: &str, config: &Config) -> LoadReport {
        let mut errors = Vec::new();
        let document = Document::parse(text, &mut errors);

        let configured = match config.time_zone() {
            Ok(tz) => tz,
            Err(err) => {
                errors.push(err);
                None
            }
        };
        let tz = match (configured, &document.time_zone) {
            (Some(tz), _) => tz,
            (None, Some(name)) => resolve_time_zone(name).unwrap_or_else(|err| {
                tracing::warn!(%name, "unknown calendar time zone, using UTC");
                errors.push(err);
                TimeZone::UTC
            }),
            (None, None) => TimeZone::system(),
        };

        let mut calendar = Self::new(tz).with_search_horizon_days(config.search_horizon_days());
        *calendar.info_mut() = document.info;

        for draft in document.events {
            let event = match draft.build(calendar.time_zone()) {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "skipped event");
                    errors.push(err);
                    continue;
                }
            };
            if let Err(err) = calendar.insert(event) {
                errors.push(err);
            }
        }

        tracing::debug!(
            events = calendar.len(),
            errors = errors.len(),
            "loaded calendar"
        );
        LoadReport { calendar, errors }
    }
}

/// The parts of an iCalendar text the calendar needs. The properties of
/// the first `VCALENDAR` win, the events of all of them are kept.
#[derive(Debug, Default)]
struct Document {
    info: CalendarInfo,
    time_zone: Option<String>,
    events: Vec<EventDraft>,
}

impl Document {
    fn parse(text: &str, errors: &mut Vec<CalendarError>) -> Self {
        let mut document = Self::default();
        for (i, parsed) in IcalParser::new(text.as_bytes()).enumerate() {
            match parsed {
                Ok(calendar) => document.add(calendar, i == 0),
                Err(err) => {
                    tracing::warn!(error = %err, "malformed calendar text");
                    errors.push(CalendarError::Ics {
                        component: KW_VCALENDAR.to_owned(),
                        message: err.to_string(),
                    });
                    break;
                }
            }
        }
        document
    }

    fn add(&mut self, calendar: IcalCalendar, first: bool) {
        if first {
            for property in &calendar.properties {
                self.apply(property);
            }
        }
        let offset = self.events.len();
        self.events.extend(
            calendar
                .events
                .iter()
                .enumerate()
                .map(|(i, event)| EventDraft::new(offset + i + 1, event)),
        );
    }

    fn apply(&mut self, property: &Property) {
        let value = || property.value.as_deref().unwrap_or_default();
        match property.name.to_ascii_uppercase().as_str() {
            KW_X_WR_CALNAME => self.info.name = Some(unescape(value())),
            KW_X_WR_CALDESC => self.info.description = Some(unescape(value())),
            KW_VERSION => self.info.version = Some(value().trim().to_owned()),
            KW_X_WR_TIMEZONE => self.time_zone = Some(value().trim().to_owned()),
            _ => {}
        }
    }
}

/// The properties of one `VEVENT`, read before the calendar zone is known.
#[derive(Debug, Default)]
struct EventDraft {
    position: usize,
    uid: Option<String>,
    dtstart: Option<Property>,
    dtend: Option<Property>,
    duration: Option<Property>,
    rrule: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    status: Option<EventStatus>,
}

impl EventDraft {
    /// Reads the `position`-th (1-based) event of the text.
    fn new(position: usize, event: &IcalEvent) -> Self {
        let mut draft = Self {
            position,
            ..Self::default()
        };
        for property in &event.properties {
            draft.apply(property);
        }
        draft
    }

    fn apply(&mut self, property: &Property) {
        let value = property.value.as_deref().unwrap_or_default();
        match property.name.to_ascii_uppercase().as_str() {
            KW_UID => self.uid = Some(value.trim().to_owned()),
            KW_DTSTART => self.dtstart = Some(property.clone()),
            KW_DTEND => self.dtend = Some(property.clone()),
            KW_DURATION => self.duration = Some(property.clone()),
            KW_RRULE => self.rrule = Some(value.trim().to_owned()),
            KW_SUMMARY => self.summary = Some(unescape(value)),
            KW_DESCRIPTION => self.description = Some(unescape(value)),
            KW_LOCATION => self.location = Some(unescape(value)),
            KW_STATUS => self.status = value.trim().parse().ok(),
            _ => {}
        }
    }

    /// How errors name the event: its `UID`, else its position.
    fn label(&self) -> String {
        match &self.uid {
            Some(uid) => format!("{KW_VEVENT} {uid}"),
            None => format!("{KW_VEVENT} #{}", self.position),
        }
    }

    fn error(&self, property: &str, err: impl std::fmt::Display) -> CalendarError {
        CalendarError::Ics {
            component: self.label(),
            message: format!("{property}: {err}"),
        }
    }

    fn build(self, tz: &TimeZone) -> Result<Event, CalendarError> {
        let Some(dtstart) = &self.dtstart else {
            return Err(self.error(KW_DTSTART, "missing"));
        };
        let (start, start_is_date) =
            zoned(dtstart, tz).map_err(|err| self.error(KW_DTSTART, err))?;

        let (end, end_is_date) = if let Some(dtend) = &self.dtend {
            zoned(dtend, tz).map_err(|err| self.error(KW_DTEND, err))?
        } else if let Some(duration) = &self.duration {
            let span: Span = duration
                .value
                .as_deref()
                .unwrap_or_default()
                .trim()
                .parse()
                .map_err(|err| self.error(KW_DURATION, err))?;
            let end = start
                .checked_add(span)
                .map_err(|err| self.error(KW_DURATION, err))?;
            (end, start_is_date)
        } else {
            (start.clone(), start_is_date)
        };

        // the end day of a whole-day event is exclusive
        let end = if start_is_date && end_is_date && end > start {
            let property = if self.dtend.is_some() { KW_DTEND } else { KW_DURATION };
            end.checked_sub(1.day())
                .map_err(|err| self.error(property, err))?
        } else {
            end
        };

        let mut event = Event::new(uuid::Uuid::new_v4().to_string(), start, end);
        event.whole_day |= start_is_date;
        event.imported_id = self.uid;
        event.rrule = self.rrule.unwrap_or_default();
        event.summary = self.summary.unwrap_or_default();
        event.description = self.description;
        event.location = self.location;
        event.status = self.status;
        Ok(event)
    }
}

fn param<'a>(property: &'a Property, key: &str) -> Option<&'a str> {
    property
        .params
        .iter()
        .flatten()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, values)| values.first())
        .map(|v| v.trim().trim_matches('"'))
}

/// The date-time value of `property` in `tz`, and whether it is a plain
/// date.
fn zoned(property: &Property, tz: &TimeZone) -> Result<(Zoned, bool), String> {
    let value = property.value.as_deref().unwrap_or_default().trim();
    let text = match param(property, KW_TZID) {
        Some(tzid) => format!("{KW_TZID}={tzid}:{value}"),
        None => value.to_owned(),
    };

    let parsed: RuleDateTime = text.parse().map_err(|err| format!("{err}"))?;
    let is_date = parsed.is_date()
        || param(property, KW_VALUE).is_some_and(|v| v.eq_ignore_ascii_case(KW_VALUE_DATE));
    let zdt = parsed.to_zoned(tz).map_err(|err| err.to_string())?;
    Ok((zdt, is_date))
}

/// Undoes the TEXT escapes of RFC 5545 Section 3.3.11, which the parser
/// leaves in place.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    /// The first event of a calendar wrapping `body`.
    fn draft(body: &str) -> EventDraft {
        let text = format!("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n{body}END:VEVENT\r\nEND:VCALENDAR\r\n");
        let calendar = IcalParser::new(text.as_bytes()).next().unwrap().unwrap();
        EventDraft::new(1, &calendar.events[0])
    }

    fn build(body: &str) -> Result<Event, CalendarError> {
        draft(body).build(&TimeZone::UTC)
    }

    #[test]
    fn unescapes_text() {
        assert_eq!(unescape(r"a\, b\; c\\d\ne"), "a, b; c\\d\ne");
    }

    #[test]
    fn reads_every_date_time_form() {
        let tz = TimeZone::get("Asia/Shanghai").unwrap();
        let start = |line: &str| {
            let draft = draft(&format!("{line}\r\n"));
            zoned(draft.dtstart.as_ref().unwrap(), &tz).unwrap()
        };

        let (utc, is_date) = start("DTSTART:20240616T060000Z");
        assert_eq!(utc.datetime(), date(2024, 6, 16).at(14, 0, 0, 0));
        assert!(!is_date);

        let (floating, _) = start("DTSTART:20240616T060000");
        assert_eq!(floating.datetime(), date(2024, 6, 16).at(6, 0, 0, 0));

        let (paris, _) = start("DTSTART;TZID=Europe/Paris:20240616T060000");
        assert_eq!(paris.datetime(), date(2024, 6, 16).at(12, 0, 0, 0));

        let (day, is_date) = start("DTSTART;VALUE=DATE:20240616");
        assert_eq!(day.datetime(), date(2024, 6, 16).at(0, 0, 0, 0));
        assert!(is_date);
    }

    #[test]
    fn whole_day_end_is_exclusive() {
        let event = build("DTSTART;VALUE=DATE:20240616\r\nDTEND;VALUE=DATE:20240618\r\n").unwrap();
        assert!(event.whole_day);
        assert_eq!(event.end.date(), date(2024, 6, 17));
    }

    #[test]
    fn whole_day_duration_is_exclusive() {
        let event = build("DTSTART;VALUE=DATE:20240616\r\nDURATION:P1D\r\n").unwrap();
        assert!(event.whole_day);
        assert_eq!(event.end.date(), date(2024, 6, 16));

        let event = build("DTSTART;VALUE=DATE:20240616\r\nDURATION:P3D\r\n").unwrap();
        assert_eq!(event.end.date(), date(2024, 6, 18));
    }

    #[test]
    fn duration_sets_the_end() {
        let event = build("DTSTART:20240616T060000Z\r\nDURATION:PT1H30M\r\n").unwrap();
        assert_eq!(event.end.datetime(), date(2024, 6, 16).at(7, 30, 0, 0));
    }

    #[test]
    fn missing_dtstart_names_the_event() {
        let err = build("UID:lost@example.com\r\nSUMMARY:Lost\r\n").unwrap_err();
        assert_eq!(err.to_string(), "VEVENT lost@example.com: DTSTART: missing");

        let err = build("SUMMARY:Anonymous\r\n").unwrap_err();
        assert!(matches!(err, CalendarError::Ics { component, .. } if component == "VEVENT #1"));
    }
}
