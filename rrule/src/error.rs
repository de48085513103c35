// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::rule::Frequency;

/// Errors raised while building or compiling a recurrence rule.
///
/// Evaluating a compiled expression never fails; every error surfaces when the
/// rule is parsed, constructed or compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RRuleError {
    /// A rule part is malformed or outside the bounds of RFC 5545.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending rule part, e.g. `BYMONTH`.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The rule is well formed but its frequency cannot be compiled.
    #[error("{0} recurrence cannot be compiled into a temporal expression")]
    UnsupportedFrequency(Frequency),
}

impl RRuleError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The rule part a validation error is about.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::UnsupportedFrequency(_) => None,
        }
    }
}
