// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use almanac_core::Config as CoreConfig;
use almanac_rrule::{RecurrenceRule, next_n};
use clap::{ArgMatches, Command, arg, value_parser};
use colored::Colorize;
use jiff::{civil::Date, tz::TimeZone};

use crate::util::parse_date;

#[derive(Debug, Clone)]
pub struct CmdRrule {
    pub rule: String,
    pub from: Option<String>,
    pub count: usize,
}

impl CmdRrule {
    pub const NAME: &str = "rrule";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Validate a recurrence rule and list its next days")
            .arg(arg!(<RULE> "Recurrence rule, e.g. FREQ=MONTHLY;INTERVAL=2"))
            .arg(arg!(--from <DATE> "First occurrence when the rule has no DTSTART: YYYY-MM-DD, today or tomorrow"))
            .arg(
                arg!(-n --count <COUNT> "Number of days to list")
                    .value_parser(value_parser!(usize))
                    .default_value("5"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: matches.get_one::<String>("RULE").cloned().unwrap_or_default(),
            from: matches.get_one("from").cloned(),
            count: matches.get_one("count").copied().unwrap_or(5),
        }
    }

    #[tracing::instrument(skip_all, fields(rule = %self.rule))]
    pub fn run(self, core: &CoreConfig) -> Result<(), Box<dyn Error>> {
        let tz = match core.time_zone()? {
            Some(tz) => tz,
            None => TimeZone::system(),
        };
        let from = parse_date(self.from.as_deref().unwrap_or("today"), &tz)?;

        let mut rule: RecurrenceRule = self.rule.parse()?;
        println!("{} {}", "Rule:".green(), rule);

        let days = occurrences(&mut rule, from, self.count, &tz, core.search_horizon_days())?;
        if days.is_empty() {
            println!("{}", "No occurrences within the search horizon".dimmed());
        }
        for day in days {
            println!("{}", day.strftime("%a %Y-%m-%d"));
        }
        Ok(())
    }
}

/// Compiles `rule` for a single-day occurrence starting at its `DTSTART`, or
/// at `from` when it has none, and lists the first `count` matching days.
fn occurrences(
    rule: &mut RecurrenceRule,
    from: Date,
    count: usize,
    tz: &TimeZone,
    horizon_days: u32,
) -> Result<Vec<Date>, Box<dyn Error>> {
    let start = match &rule.options().dtstart {
        Some(dtstart) => dtstart.to_zoned(tz)?,
        None => from.to_zoned(tz.clone())?,
    };
    let expr = rule.compile(&start, &start)?;
    Ok(next_n(start.date(), expr, count, horizon_days))
}
