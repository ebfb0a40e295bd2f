// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Host identifier value object.
//!
//! Hosts are identified by whatever string the fleet already uses (hostname,
//! instance id, ...); Phoenix does not mint or own these identities, it only
//! validates that they are non-empty and passes them through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PhoenixError;

/// A single target host in an experiment's host set.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HostId(String);

impl HostId {
    /// Validates and wraps a raw host identifier string.
    pub fn new(raw: impl Into<String>) -> Result<Self, PhoenixError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PhoenixError::validation("host id must not be empty"));
        }
        Ok(Self(raw))
    }

    /// Returns the host id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_host_ids() {
        assert!(HostId::new("").is_err());
        assert!(HostId::new("   ").is_err());
    }

    #[test]
    fn accepts_well_formed_host_ids() {
        assert_eq!(HostId::new("h1").unwrap().as_str(), "h1");
    }
}
