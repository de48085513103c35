// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use almanac_rrule::RRuleError;
use jiff::civil::Date;

use crate::calendar::EventRef;

/// Errors reported by the calendar.
///
/// Lookups that miss are reported with the `*NotFound` variants; they are an
/// expected outcome, not a fault of the calendar.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The recurrence rule of an event failed to parse, validate or compile.
    /// The event is kept but never matches a day.
    #[error("event {uid}: {source}")]
    Rule {
        /// Identifier of the event the rule belongs to.
        uid: String,
        /// What is wrong with the rule.
        source: RRuleError,
    },

    /// No event has the identifier.
    #[error("event not found: {id}")]
    EventNotFound {
        /// The identifier looked up.
        id: String,
    },

    /// No one-off event is indexed on the day.
    #[error("no events indexed on {date}")]
    DateNotFound {
        /// The day looked up.
        date: Date,
    },

    /// The reference does not point into this calendar.
    #[error("no event at {0}")]
    RefNotFound(EventRef),

    /// A time zone name is not in the time zone database.
    #[error("invalid time zone '{name}': {source}")]
    InvalidTimeZone {
        /// The zone name.
        name: String,
        /// Why the lookup failed.
        source: jiff::Error,
    },

    /// Malformed calendar text or an unreadable event record.
    #[error("{component}: {message}")]
    Ics {
        /// The component at fault: `VCALENDAR`, or the `UID` (else the
        /// position) of a `VEVENT`.
        component: String,
        /// What is wrong.
        message: String,
    },
}

impl CalendarError {
    /// Returns true for the lookup misses.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound { .. } | Self::DateNotFound { .. } | Self::RefNotFound(_)
        )
    }
}
