// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

use almanac_rrule::{RecurrenceRule, TemporalExpression, next_occurrence};
use jiff::Zoned;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::config::{Config, DEFAULT_SEARCH_HORIZON_DAYS};
use crate::error::CalendarError;
use crate::event::Event;

/// A position in a [`Calendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventRef {
    /// A one-off event, by its position in the event storage.
    Direct(usize),

    /// A recurring event, by the position of its rule.
    Recurring(usize),
}

impl Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRef::Direct(i) => write!(f, "event #{i}"),
            EventRef::Recurring(i) => write!(f, "recurring rule #{i}"),
        }
    }
}

/// Descriptive properties of a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarInfo {
    /// Display name.
    pub name: Option<String>,

    /// Description.
    pub description: Option<String>,

    /// Version of the format the calendar was read from.
    pub version: Option<String>,
}

#[derive(Debug)]
struct Recurring {
    event: usize,
    expr: TemporalExpression,
}

/// A set of events indexed by identifier and by day.
///
/// Events are only ever appended: every index into the storage stays valid
/// for the lifetime of the calendar. One-off events are listed under every
/// day from their start day to their end day, both inclusive, in the
/// calendar's zone. Recurring events are stored once with their compiled
/// rule and evaluated on query.
#[derive(Debug)]
pub struct Calendar {
    info: CalendarInfo,
    tz: TimeZone,
    search_horizon_days: u32,
    events: Vec<Event>,
    by_date: BTreeMap<Date, Vec<usize>>,
    by_id: HashMap<String, EventRef>,
    by_imported_id: HashMap<String, EventRef>,
    recurring: Vec<Recurring>,
}

impl Calendar {
    /// Creates an empty calendar computing day boundaries in `tz`.
    #[must_use]
    pub fn new(tz: TimeZone) -> Self {
        Self {
            info: CalendarInfo::default(),
            tz,
            search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
            events: Vec::new(),
            by_date: BTreeMap::new(),
            by_id: HashMap::new(),
            by_imported_id: HashMap::new(),
            recurring: Vec::new(),
        }
    }

    /// Creates an empty calendar from the configuration. The system zone is
    /// used when none is configured.
    pub fn from_config(config: &Config) -> Result<Self, CalendarError> {
        let tz = config.time_zone()?.unwrap_or_else(TimeZone::system);
        Ok(Self::new(tz).with_search_horizon_days(config.search_horizon_days()))
    }

    /// Sets how many days [`Self::next_occurrence`] looks ahead.
    #[must_use]
    pub fn with_search_horizon_days(mut self, days: u32) -> Self {
        self.search_horizon_days = days;
        self
    }

    /// The zone day boundaries are computed in.
    #[must_use]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Descriptive properties.
    #[must_use]
    pub fn info(&self) -> &CalendarInfo {
        &self.info
    }

    /// Descriptive properties, for editing.
    pub fn info_mut(&mut self) -> &mut CalendarInfo {
        &mut self.info
    }

    /// All events, in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when the calendar holds no event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Adds an event and returns its position in [`Self::events`].
    ///
    /// A recurring event whose rule fails to parse or compile is still kept
    /// and can be looked up by identifier, but it never matches a day; the
    /// failure is returned as [`CalendarError::Rule`].
    #[tracing::instrument(skip_all, fields(id = %event.id))]
    pub fn insert(&mut self, event: Event) -> Result<usize, CalendarError> {
        let index = self.events.len();
        let compiled = event.is_recurring().then(|| self.compile(&event));

        let (reference, failure) = match compiled {
            None => {
                let (first, last) = self.day_span(&event);
                let mut day = first;
                loop {
                    self.by_date.entry(day).or_default().push(index);
                    match day.tomorrow() {
                        Ok(next) if next <= last => day = next,
                        _ => break,
                    }
                }
                tracing::debug!(%first, %last, "indexed one-off event");
                (EventRef::Direct(index), None)
            }
            Some(Ok(expr)) => {
                self.recurring.push(Recurring { event: index, expr });
                tracing::debug!(rrule = %event.rrule, "indexed recurring event");
                (EventRef::Recurring(self.recurring.len() - 1), None)
            }
            Some(Err(source)) => (EventRef::Direct(index), Some(source)),
        };

        self.by_id.insert(event.id.clone(), reference);
        if let Some(imported_id) = &event.imported_id {
            self.by_imported_id.insert(imported_id.clone(), reference);
        }

        let uid = event.display_id().to_owned();
        self.events.push(event);
        match failure {
            Some(source) => {
                tracing::warn!(%uid, error = %source, "recurring event never matches");
                Err(CalendarError::Rule { uid, source })
            }
            None => Ok(index),
        }
    }

    fn compile(&self, event: &Event) -> Result<TemporalExpression, almanac_rrule::RRuleError> {
        let mut rule: RecurrenceRule = event.rrule.trim().parse()?;
        let start = event.start.with_time_zone(self.tz.clone());
        let end = event.end.with_time_zone(self.tz.clone());
        rule.compile(&start, &end)?;
        Ok(rule.into_compiled())
    }

    /// First and last day of a one-off event in the calendar's zone.
    fn day_span(&self, event: &Event) -> (Date, Date) {
        let first = event.start.with_time_zone(self.tz.clone()).date();
        let last = event.end.with_time_zone(self.tz.clone()).date();
        (first, last.max(first))
    }

    /// Events active on `date`: the one-off events listed under the day in
    /// insertion order, then the recurring events whose rule includes the
    /// day, in the order the rules were registered.
    #[must_use]
    pub fn events_on(&self, date: Date) -> Vec<&Event> {
        self.refs_active_on(date)
            .into_iter()
            .filter_map(|r| self.event_by_ref(r).ok())
            .collect()
    }

    /// Events active on the calendar day of `zdt`, seen from the calendar's
    /// zone.
    #[must_use]
    pub fn events_at(&self, zdt: &Zoned) -> Vec<&Event> {
        self.events_on(zdt.with_time_zone(self.tz.clone()).date())
    }

    /// The one-off events listed under `date`.
    pub fn event_refs_on(&self, date: Date) -> Result<Vec<EventRef>, CalendarError> {
        match self.by_date.get(&date) {
            Some(bucket) => Ok(bucket.iter().copied().map(EventRef::Direct).collect()),
            None => Err(CalendarError::DateNotFound { date }),
        }
    }

    /// References to every event active on `date`, in the order of
    /// [`Self::events_on`].
    #[must_use]
    pub fn refs_active_on(&self, date: Date) -> Vec<EventRef> {
        let direct = self
            .by_date
            .get(&date)
            .into_iter()
            .flatten()
            .copied()
            .map(EventRef::Direct);
        let recurring = self
            .recurring
            .iter()
            .enumerate()
            .filter(|(_, r)| r.expr.includes_date(date))
            .map(|(i, _)| EventRef::Recurring(i));
        direct.chain(recurring).collect()
    }

    /// The active references of `days` successive days starting at `start`.
    #[must_use]
    pub fn timeline(&self, start: Date, days: u32) -> Vec<(Date, Vec<EventRef>)> {
        std::iter::successors(Some(start), |day| day.tomorrow().ok())
            .take(days as usize)
            .map(|day| (day, self.refs_active_on(day)))
            .collect()
    }

    /// Looks up an event by identifier.
    pub fn event_by_id(&self, id: &str) -> Result<&Event, CalendarError> {
        let reference = self
            .by_id
            .get(id)
            .ok_or_else(|| CalendarError::EventNotFound { id: id.to_owned() })?;
        self.event_by_ref(*reference)
    }

    /// Looks up an event by the identifier it carried in its source.
    pub fn event_by_imported_id(&self, id: &str) -> Result<&Event, CalendarError> {
        let reference = self
            .by_imported_id
            .get(id)
            .ok_or_else(|| CalendarError::EventNotFound { id: id.to_owned() })?;
        self.event_by_ref(*reference)
    }

    /// Resolves a reference.
    pub fn event_by_ref(&self, reference: EventRef) -> Result<&Event, CalendarError> {
        let index = match reference {
            EventRef::Direct(i) => Some(i),
            EventRef::Recurring(i) => self.recurring.get(i).map(|r| r.event),
        };
        index
            .and_then(|i| self.events.get(i))
            .ok_or(CalendarError::RefNotFound(reference))
    }

    /// The compiled rule of a recurring event.
    #[must_use]
    pub fn recurrence(&self, reference: EventRef) -> Option<&TemporalExpression> {
        match reference {
            EventRef::Recurring(i) => self.recurring.get(i).map(|r| &r.expr),
            EventRef::Direct(_) => None,
        }
    }

    /// The first day on or after `from` the event is active, within the
    /// search horizon.
    pub fn next_occurrence(
        &self,
        reference: EventRef,
        from: Date,
    ) -> Result<Option<Date>, CalendarError> {
        let event = self.event_by_ref(reference)?;
        if let Some(expr) = self.recurrence(reference) {
            return Ok(next_occurrence(from, expr, self.search_horizon_days));
        }
        if event.is_recurring() {
            return Ok(None);
        }

        let (first, last) = self.day_span(event);
        Ok((last >= from).then(|| first.max(from)))
    }
}
