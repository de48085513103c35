// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::tz::TimeZone;

use crate::error::CalendarError;

/// The name of the application.
pub const APP_NAME: &str = "almanac";

/// How far ahead occurrence searches look when not configured, about ten years.
pub const DEFAULT_SEARCH_HORIZON_DAYS: u32 = 3660;

/// Configuration of a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Config {
    /// IANA name of the zone day boundaries are computed in. The calendar's
    /// own zone, then the system zone, is used when unset.
    #[serde(default)]
    pub time_zone: Option<String>,

    /// Number of days occurrence searches look ahead.
    #[serde(default)]
    pub search_horizon_days: Option<u32>,
}

impl Config {
    /// The configured time zone, `None` when unset.
    pub fn time_zone(&self) -> Result<Option<TimeZone>, CalendarError> {
        self.time_zone
            .as_deref()
            .map(resolve_time_zone)
            .transpose()
    }

    /// The search horizon with its default applied.
    #[must_use]
    pub fn search_horizon_days(&self) -> u32 {
        self.search_horizon_days
            .unwrap_or(DEFAULT_SEARCH_HORIZON_DAYS)
    }
}

/// Looks up a zone in the time zone database.
pub(crate) fn resolve_time_zone(name: &str) -> Result<TimeZone, CalendarError> {
    TimeZone::get(name).map_err(|source| CalendarError::InvalidTimeZone {
        name: name.to_owned(),
        source,
    })
}
