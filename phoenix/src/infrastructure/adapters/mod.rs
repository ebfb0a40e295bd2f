// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HTTP adapters for the three external collaborators the domain only
//! knows as traits: the config generator, the fleet agent, and the metrics
//! backend.

pub mod fleet_http;
pub mod generator_http;
pub mod metrics_http;

pub use fleet_http::HttpFleetClient;
pub use generator_http::HttpGeneratorClient;
pub use metrics_http::HttpMetricsClient;
