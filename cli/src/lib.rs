// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line queries over iCalendar files.

mod cli;
mod cmd_events;
mod cmd_rrule;
mod cmd_timeline;
mod config;
mod formatter;
mod util;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::{Config, parse_config};
