// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::Path};

use almanac_core::{Calendar, Config as CoreConfig, LoadReport};
use colored::Colorize;
use jiff::{Zoned, civil::Date, tz::TimeZone};
use tokio::fs;

use crate::config::Config;

/// Parses `today`, `tomorrow`, `yesterday` or a `YYYY-MM-DD` date. The
/// relative forms are taken in `tz`.
pub fn parse_date(s: &str, tz: &TimeZone) -> Result<Date, Box<dyn Error>> {
    let today = || Zoned::now().with_time_zone(tz.clone()).date();
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "today" => Ok(today()),
        "tomorrow" => Ok(today().tomorrow()?),
        "yesterday" => Ok(today().yesterday()?),
        other => other
            .parse::<Date>()
            .map_err(|e| format!("Invalid date '{s}', expected YYYY-MM-DD: {e}").into()),
    }
}

/// Loads the calendar at `file`, or at the configured calendar path.
///
/// A file that cannot be read loads an empty calendar. Problems found while
/// loading are printed as warnings.
pub async fn read_calendar(
    file: Option<&Path>,
    core: &CoreConfig,
    config: &Config,
) -> Result<Calendar, Box<dyn Error>> {
    let path = file
        .or(config.calendar_path.as_deref())
        .ok_or("No calendar file given and no calendar_path configured")?;

    tracing::debug!(path = %path.display(), "reading calendar");
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), err = %e, "failed to read calendar");
            String::new()
        }
    };

    let LoadReport { calendar, errors } = Calendar::load_str(&text, core);
    for err in &errors {
        println!("{} {}", "Warning:".yellow(), err);
    }
    Ok(calendar)
}
