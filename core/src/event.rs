// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use jiff::Zoned;
use jiff::civil::Time;

const STATUS_TENTATIVE: &str = "TENTATIVE";
const STATUS_CONFIRMED: &str = "CONFIRMED";
const STATUS_CANCELLED: &str = "CANCELLED";

/// A calendar event, as handed to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Identifier, unique within a calendar.
    pub id: String,

    /// Identifier the event carried in its source, e.g. the ICS `UID`.
    pub imported_id: Option<String>,

    /// Start of the (first) occurrence.
    pub start: Zoned,

    /// End of the (first) occurrence.
    pub end: Zoned,

    /// Recurrence rule text, empty for a one-off event.
    pub rrule: String,

    /// The summary of the event.
    pub summary: String,

    /// The description of the event, if available.
    pub description: Option<String>,

    /// The location of the event, if available.
    pub location: Option<String>,

    /// The status of the event, if available.
    pub status: Option<EventStatus>,

    /// Whether the event covers whole days rather than a time slot.
    pub whole_day: bool,
}

impl Event {
    /// Creates a one-off event. It is a whole-day event when both bounds fall
    /// on midnight.
    pub fn new(id: impl Into<String>, start: Zoned, end: Zoned) -> Self {
        let whole_day = start.time() == Time::midnight() && end.time() == Time::midnight();
        Self {
            id: id.into(),
            imported_id: None,
            start,
            end,
            rrule: String::new(),
            summary: String::new(),
            description: None,
            location: None,
            status: None,
            whole_day,
        }
    }

    /// Sets the recurrence rule text.
    #[must_use]
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = rrule.into();
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the imported identifier.
    #[must_use]
    pub fn with_imported_id(mut self, imported_id: impl Into<String>) -> Self {
        self.imported_id = Some(imported_id.into());
        self
    }

    /// Returns true when the event carries a recurrence rule.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        !self.rrule.trim().is_empty()
    }

    /// The identifier the event is best known by: the imported one when
    /// present.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.imported_id.as_deref().unwrap_or(&self.id)
    }
}

/// The status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// The event is tentative.
    Tentative,

    /// The event is confirmed.
    Confirmed,

    /// The event is cancelled.
    Cancelled,
}

impl AsRef<str> for EventStatus {
    fn as_ref(&self) -> &str {
        match self {
            EventStatus::Tentative => STATUS_TENTATIVE,
            EventStatus::Confirmed => STATUS_CONFIRMED,
            EventStatus::Cancelled => STATUS_CANCELLED,
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl FromStr for EventStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STATUS_TENTATIVE => Ok(EventStatus::Tentative),
            STATUS_CONFIRMED => Ok(EventStatus::Confirmed),
            STATUS_CANCELLED => Ok(EventStatus::Cancelled),
            _ => Err(()),
        }
    }
}
