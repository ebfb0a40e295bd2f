// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single hierarchical error type for the experiment control plane. The
//! variants map directly onto the error taxonomy every layer agrees on:
//!
//! - **validation** — bad input, never retried, surfaced as 400.
//! - **not_found** — 404.
//! - **conflict** — concurrent phase mismatch, retried internally by the
//!   scheduler/controller.
//! - **transient** — network, 5xx, metrics gap; retried with backoff.
//! - **unrecoverable** — retries exhausted, invalid template, criteria
//!   unevaluable; causes the owning experiment to transition to `failed`.
//!
//! Infrastructure-flavored variants (`Io`, `Database`, `Serialization`,
//! `Timeout`) exist so adapters can report failures without inventing a
//! parallel error type, but every call site that needs to make a retry/fail
//! decision should go through [`PhoenixError::category`] or
//! [`PhoenixError::is_recoverable`] rather than matching concrete variants.

use thiserror::Error;

/// Domain-specific errors for the Phoenix experiment control plane.
///
/// Every variant carries a human-readable message. Variants are grouped by
/// the error taxonomy from the control plane's error handling design: each
/// one is either `validation`, `not_found`, `conflict`, `transient`, or
/// `unrecoverable` (see [`PhoenixError::category`]).
#[derive(Error, Debug, Clone)]
pub enum PhoenixError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Experiment not found: {0}")]
    NotFound(String),

    #[error("Experiment already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Unrecoverable failure: {0}")]
    Unrecoverable(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PhoenixError {
    /// Creates a new configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Creates a new not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a new conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Creates a new transient error.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Creates a new unrecoverable error.
    pub fn unrecoverable(msg: impl Into<String>) -> Self {
        Self::Unrecoverable(msg.into())
    }

    /// Creates a new database error.
    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Creates a new internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Returns `true` for errors the caller may retry without operator
    /// intervention.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PhoenixError::TimeoutError(_) | PhoenixError::Transient(_) | PhoenixError::IoError(_)
        )
    }

    /// Returns `true` for a conditional-update race, the only error kind the
    /// scheduler treats as "someone else already moved this forward".
    pub fn is_conflict(&self) -> bool {
        matches!(self, PhoenixError::Conflict(_))
    }

    /// Maps the error onto the control plane's stable error taxonomy.
    ///
    /// The string is also the machine-readable `code` field in the HTTP
    /// error envelope.
    pub fn category(&self) -> &'static str {
        match self {
            PhoenixError::InvalidConfiguration(_) => "validation",
            PhoenixError::ValidationError(_) => "validation",
            PhoenixError::NotFound(_) => "not_found",
            PhoenixError::AlreadyExists(_) => "conflict",
            PhoenixError::Conflict(_) => "conflict",
            PhoenixError::Transient(_) => "transient",
            PhoenixError::Unrecoverable(_) => "unrecoverable",
            PhoenixError::IoError(_) => "transient",
            PhoenixError::DatabaseError(_) => "transient",
            PhoenixError::SerializationError(_) => "validation",
            PhoenixError::TimeoutError(_) => "transient",
            PhoenixError::InternalError(_) => "unrecoverable",
        }
    }
}

impl From<std::io::Error> for PhoenixError {
    fn from(err: std::io::Error) -> Self {
        PhoenixError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PhoenixError {
    fn from(err: serde_json::Error) -> Self {
        PhoenixError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors_are_flagged() {
        assert!(PhoenixError::TimeoutError("slow".into()).is_recoverable());
        assert!(PhoenixError::Transient("network blip".into()).is_recoverable());
        assert!(!PhoenixError::ValidationError("bad input".into()).is_recoverable());
    }

    #[test]
    fn categories_match_the_documented_taxonomy() {
        assert_eq!(PhoenixError::validation("x").category(), "validation");
        assert_eq!(PhoenixError::not_found("x").category(), "not_found");
        assert_eq!(PhoenixError::conflict("x").category(), "conflict");
        assert_eq!(PhoenixError::transient("x").category(), "transient");
        assert_eq!(PhoenixError::unrecoverable("x").category(), "unrecoverable");
    }

    #[test]
    fn conflict_detection_is_narrow() {
        assert!(PhoenixError::conflict("race").is_conflict());
        assert!(!PhoenixError::transient("timeout").is_conflict());
    }
}
