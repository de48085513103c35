// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf};

use almanac_core::Config as CoreConfig;
use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;

use crate::config::Config;
use crate::formatter::EventFormatter;
use crate::util::{parse_date, read_calendar};

#[derive(Debug, Clone)]
pub struct CmdTimeline {
    pub file: Option<PathBuf>,
    pub from: Option<String>,
    pub days: u32,
}

impl CmdTimeline {
    pub const NAME: &str = "timeline";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List the events of successive days")
            .arg(
                arg!([FILE] "Calendar file, defaults to the configured calendar_path")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--from <DATE> "First day: YYYY-MM-DD, today or tomorrow"))
            .arg(
                arg!(--days <DAYS> "Number of days to list")
                    .value_parser(value_parser!(u32).range(1..=366))
                    .default_value("7"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            file: matches.get_one("FILE").cloned(),
            from: matches.get_one("from").cloned(),
            days: matches.get_one("days").copied().unwrap_or(7),
        }
    }

    #[tracing::instrument(skip_all, fields(file = ?self.file, from = ?self.from, days = self.days))]
    pub async fn run(self, core: &CoreConfig, config: &Config) -> Result<(), Box<dyn Error>> {
        let calendar = read_calendar(self.file.as_deref(), core, config).await?;
        let tz = calendar.time_zone().clone();
        let start = parse_date(self.from.as_deref().unwrap_or("today"), &tz)?;

        for (day, refs) in calendar.timeline(start, self.days) {
            let events: Vec<_> = refs
                .into_iter()
                .filter_map(|r| calendar.event_by_ref(r).ok())
                .collect();

            println!("{}", day.strftime("%a %Y-%m-%d").to_string().bold());
            if events.is_empty() {
                println!("  {}", "-".dimmed());
                continue;
            }
            for line in EventFormatter::new(day, tz.clone()).format(&events).to_string().lines() {
                println!("  {line}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_week() {
        let matches = CmdTimeline::command().try_get_matches_from(["timeline"]).unwrap();
        let cmd = CmdTimeline::from(&matches);
        assert_eq!(cmd.days, 7);
        assert_eq!(cmd.from, None);
    }

    #[test]
    fn rejects_zero_days() {
        let result = CmdTimeline::command().try_get_matches_from(["timeline", "--days", "0"]);
        assert!(result.is_err());
    }
}
