// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests understood by `DaemonService`/`MetricsService` plus the health
//! sub-protocol and a `Stop` control op needed by `sv-cli`.

use serde::{Deserialize, Serialize};

/// Streaming calls use this as their requested cadence; 0 means "use the
/// server default" and anything below the floor is raised to it.
pub type IntervalMs = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum Request {
    GetState,
    StreamState { interval_ms: IntervalMs },
    ListProcesses,
    GetProcess { service_name: String },
    StreamProcessMetrics { service_name: String, interval_ms: IntervalMs },
    GetSystemMetrics,
    StreamSystemMetrics { interval_ms: IntervalMs },
    StreamAllProcessMetrics { interval_ms: IntervalMs },
    /// Health check for one logical service name ("" = server-global).
    Health { service: String },
    /// Not part of the read-only snapshot schema, but needed for `sv stop`
    /// to request a graceful shutdown with a deadline.
    Stop { service_name: String, deadline_ms: u64 },
    /// Ends a streaming call from the client side.
    Cancel,
}
