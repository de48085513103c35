// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use almanac_core::APP_NAME;
use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cmd_events::CmdEvents;
use crate::cmd_rrule::CmdRrule;
use crate::cmd_timeline::CmdTimeline;
use crate::config::parse_config;

/// Run the Almanac command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    match Cli::parse() {
        Ok(cli) => {
            init_tracing(cli.verbose);
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// `RUST_LOG` when set, else `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Log debug information
    pub verbose: bool,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Query calendars and recurrence rules.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/almanac/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/almanac/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(-v --verbose "Log debug information").global(true))
            .subcommand(CmdEvents::command())
            .subcommand(CmdTimeline::command())
            .subcommand(CmdRrule::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let command = match matches.subcommand() {
            Some((CmdEvents::NAME, matches)) => Commands::Events(CmdEvents::from(matches)),
            Some((CmdTimeline::NAME, matches)) => Commands::Timeline(CmdTimeline::from(matches)),
            Some((CmdRrule::NAME, matches)) => Commands::Rrule(CmdRrule::from(matches)),
            _ => return Err("A subcommand is required".into()),
        };

        Ok(Cli {
            config: matches.get_one("config").cloned(),
            verbose: matches.get_flag("verbose"),
            command,
        })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List the events of a day
    Events(CmdEvents),

    /// List the events of successive days
    Timeline(CmdTimeline),

    /// Check a recurrence rule
    Rrule(CmdRrule),
}

impl Commands {
    /// Run the command with the given configuration
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        tracing::debug!("parsing configuration...");
        let (core, config) = parse_config(config).await?;
        match self {
            Commands::Events(a) => a.run(&core, &config).await,
            Commands::Timeline(a) => a.run(&core, &config).await,
            Commands::Rrule(a) => a.run(&core),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let args = vec!["test", "-c", "/tmp/config.toml", "events"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Events(_)));
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(vec!["test", "timeline", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Timeline(_)));
    }

    #[test]
    fn test_parse_requires_a_subcommand() {
        assert!(Cli::try_parse_from(vec!["test"]).is_err());
    }

    #[test]
    fn test_parse_events() {
        let args = vec!["test", "events", "cal.ics", "--date", "2024-06-16"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Events(cmd) => {
                assert_eq!(cmd.file, Some(PathBuf::from("cal.ics")));
                assert_eq!(cmd.date.as_deref(), Some("2024-06-16"));
            }
            _ => panic!("Expected Events command"),
        }
    }

    #[test]
    fn test_parse_timeline() {
        let args = vec!["test", "timeline", "--from", "2024-06-16", "--days", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Timeline(cmd) => {
                assert_eq!(cmd.file, None);
                assert_eq!(cmd.from.as_deref(), Some("2024-06-16"));
                assert_eq!(cmd.days, 3);
            }
            _ => panic!("Expected Timeline command"),
        }
    }

    #[test]
    fn test_parse_rrule() {
        let args = vec!["test", "rrule", "FREQ=DAILY;INTERVAL=2", "-n", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Rrule(cmd) => {
                assert_eq!(cmd.rule, "FREQ=DAILY;INTERVAL=2");
                assert_eq!(cmd.count, 3);
                assert_eq!(cmd.from, None);
            }
            _ => panic!("Expected Rrule command"),
        }
    }
}
