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
pub struct CmdEvents {
    pub file: Option<PathBuf>,
    pub date: Option<String>,
}

impl CmdEvents {
    pub const NAME: &str = "events";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("day")
            .about("List the events of a day")
            .arg(
                arg!([FILE] "Calendar file, defaults to the configured calendar_path")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(-d --date <DATE> "The day to list: YYYY-MM-DD, today or tomorrow"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            file: matches.get_one("FILE").cloned(),
            date: matches.get_one("date").cloned(),
        }
    }

    #[tracing::instrument(skip_all, fields(file = ?self.file, date = ?self.date))]
    pub async fn run(self, core: &CoreConfig, config: &Config) -> Result<(), Box<dyn Error>> {
        let calendar = read_calendar(self.file.as_deref(), core, config).await?;
        let tz = calendar.time_zone().clone();
        let date = parse_date(self.date.as_deref().unwrap_or("today"), &tz)?;

        tracing::debug!(%date, "listing events");
        let events = calendar.events_on(date);
        println!("{}", date.strftime("%A, %Y-%m-%d").to_string().bold());
        if events.is_empty() {
            println!("{}", "No events".dimmed());
        } else {
            print!("{}", EventFormatter::new(date, tz).format(&events));
        }
        Ok(())
    }
}
