// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence engine: temporal expressions and the RFC 5545 recurrence rules
//! compiled into them.
//!
//! ```
//! use almanac_rrule::RecurrenceRule;
//! use jiff::civil::date;
//!
//! let mut rule: RecurrenceRule = "FREQ=MONTHLY;INTERVAL=1".parse().unwrap();
//! let start = date(2014, 1, 15).at(9, 0, 0, 0).in_tz("UTC").unwrap();
//! rule.compile(&start, &start).unwrap();
//! assert!(rule.compiled().includes_date(date(2014, 2, 15)));
//! assert!(!rule.compiled().includes_date(date(2014, 2, 16)));
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
#![allow(clippy::missing_errors_doc)]

mod error;
pub mod expr;
pub mod keyword;
mod rule;
mod search;

pub use crate::error::RRuleError;
pub use crate::expr::{Cadence, Period, TemporalExpression};
pub use crate::rule::{
    Frequency, RecurrenceRule, RuleDateTime, RuleOptions, WeekDay, WeekDayNum, compile,
};
pub use crate::search::{next_n, next_occurrence};
