// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Codes
//!
//! Unix exit codes following the BSD `sysexits.h` convention, mapped
//! straight from [`PhoenixError::category`] rather than by sniffing an
//! error's message — the category is already the stable, structured
//! signal every layer agrees on.

use std::fmt;

use phoenix_domain::PhoenixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    Error = 1,
    /// Bad CLI arguments or configuration the operator must fix.
    UsageError = 64,
    /// `validation` category: bad request shape reached all the way to a
    /// process boundary instead of being caught by the HTTP layer.
    DataError = 65,
    /// `not_found` category.
    NoInput = 66,
    /// `transient` category: a dependency (fleet, generator, metrics,
    /// database) was unreachable at startup.
    Unavailable = 69,
    /// `unrecoverable` category: an invariant the control plane cannot
    /// repair itself.
    Software = 70,
    /// `conflict` category: surfaced only if a conflict somehow escapes
    /// past the scheduler's own retry handling to the process boundary.
    TempFail = 75,
    /// Interrupted by SIGINT.
    Interrupted = 130,
    /// Terminated by SIGTERM.
    Terminated = 143,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps a startup or fatal-path error onto an exit code via its
    /// category, falling back to [`ExitCode::Error`] for anything the
    /// taxonomy doesn't name explicitly.
    pub fn from_error(error: &PhoenixError) -> Self {
        match error.category() {
            "validation" => ExitCode::DataError,
            "not_found" => ExitCode::NoInput,
            "conflict" => ExitCode::TempFail,
            "transient" => ExitCode::Unavailable,
            "unrecoverable" => ExitCode::Software,
            _ => ExitCode::Error,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Resource not found",
            ExitCode::Unavailable => "Dependency unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::TempFail => "Temporary failure",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Maps a top-level bootstrap result onto a process exit code.
pub fn result_to_exit_code(result: &Result<(), PhoenixError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(error) => ExitCode::from_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_zero() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert!(ExitCode::Success.is_success());
    }

    #[test]
    fn categories_map_to_distinct_codes() {
        assert_eq!(ExitCode::from_error(&PhoenixError::validation("x")), ExitCode::DataError);
        assert_eq!(ExitCode::from_error(&PhoenixError::not_found("x")), ExitCode::NoInput);
        assert_eq!(ExitCode::from_error(&PhoenixError::conflict("x")), ExitCode::TempFail);
        assert_eq!(ExitCode::from_error(&PhoenixError::transient("x")), ExitCode::Unavailable);
        assert_eq!(ExitCode::from_error(&PhoenixError::unrecoverable("x")), ExitCode::Software);
    }

    #[test]
    fn result_to_exit_code_follows_the_same_mapping() {
        assert_eq!(result_to_exit_code(&Ok(())), ExitCode::Success);
        assert_eq!(
            result_to_exit_code(&Err(PhoenixError::invalid_config("bad"))),
            ExitCode::from_error(&PhoenixError::invalid_config("bad"))
        );
    }

    #[test]
    fn display_includes_description_and_number() {
        let display = format!("{}", ExitCode::Software);
        assert!(display.contains("Internal software error"));
        assert!(display.contains("70"));
    }
}
