// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! A queryable calendar: events indexed by identifier and by day, with
//! recurring events evaluated through compiled recurrence rules.

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

mod calendar;
mod config;
mod error;
mod event;
mod ics;

pub use crate::calendar::{Calendar, CalendarInfo, EventRef};
pub use crate::config::{APP_NAME, Config, DEFAULT_SEARCH_HORIZON_DAYS};
pub use crate::error::CalendarError;
pub use crate::event::{Event, EventStatus};
pub use crate::ics::LoadReport;
