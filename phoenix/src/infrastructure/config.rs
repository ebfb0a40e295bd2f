// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration
//!
//! Loads [`PhoenixConfig`] from a TOML file with environment-variable
//! overrides (prefix `PHOENIX_`, double-underscore nesting — e.g.
//! `PHOENIX_HTTP_PORT=9090`), following the layered-source pattern the
//! teacher workspace uses for its own infrastructure config.

use std::time::Duration;

use phoenix_domain::PhoenixError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

/// Every configuration key the control plane recognizes. Deliberately a
/// flat struct rather than a nested section tree: every field here maps
/// directly to one of the recognized options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoenixConfig {
    pub database_url: String,
    pub generator_endpoint: String,
    pub metrics_endpoint: String,
    pub fleet_endpoint: String,
    /// Reserved: accepted and round-tripped, but this implementation
    /// realizes the generator/fleet/metrics contracts over HTTP, not gRPC.
    pub grpc_port: u16,
    pub http_port: u16,
    pub scheduler_interval_seconds: u64,
    #[serde(with = "duration_seconds")]
    pub deploy_timeout: Duration,
    #[serde(with = "duration_seconds")]
    pub initialization_timeout: Duration,
    #[serde(with = "duration_seconds")]
    pub metrics_query_timeout: Duration,
    pub environment: Environment,
    pub log_level: String,
    /// Minimum per-side sample count the analyzer requires for
    /// `sufficient_data`; left configurable per the open design question.
    pub analyzer_min_sample_size: usize,
}

impl Default for PhoenixConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://phoenix.db".into(),
            generator_endpoint: "http://localhost:8081".into(),
            metrics_endpoint: "http://localhost:8082".into(),
            fleet_endpoint: "http://localhost:8083".into(),
            grpc_port: 50051,
            http_port: 8080,
            scheduler_interval_seconds: 30,
            deploy_timeout: Duration::from_secs(5 * 60),
            initialization_timeout: Duration::from_secs(10 * 60),
            metrics_query_timeout: Duration::from_secs(10),
            environment: Environment::Development,
            log_level: "info".into(),
            analyzer_min_sample_size: 30,
        }
    }
}

impl PhoenixConfig {
    /// Loads configuration from an optional TOML file merged with
    /// `PHOENIX_*` environment variable overrides, falling back to
    /// [`PhoenixConfig::default`] for anything neither source supplies.
    pub fn load(path: Option<&str>) -> Result<Self, PhoenixError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&defaults).map_err(|e| PhoenixError::invalid_config(e.to_string()))?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PHOENIX").separator("__"),
        );

        let merged = builder
            .build()
            .map_err(|e| PhoenixError::invalid_config(e.to_string()))?;

        merged
            .try_deserialize()
            .map_err(|e| PhoenixError::invalid_config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PhoenixError> {
        if self.http_port == 0 {
            return Err(PhoenixError::invalid_config("http_port must be non-zero"));
        }
        if self.scheduler_interval_seconds == 0 {
            return Err(PhoenixError::invalid_config("scheduler_interval_seconds must be positive"));
        }
        if self.database_url.trim().is_empty() {
            return Err(PhoenixError::invalid_config("database_url must not be empty"));
        }
        Ok(())
    }
}

mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_valid() {
        assert!(PhoenixConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_http_port() {
        let mut cfg = PhoenixConfig::default();
        cfg.http_port = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_with_no_file_falls_back_to_defaults() {
        let cfg = PhoenixConfig::load(Some("/nonexistent/path/phoenix.toml")).unwrap();
        assert_eq!(cfg.http_port, PhoenixConfig::default().http_port);
    }
}
