// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use sv_core::SystemState;

use crate::dto::{DaemonStateWire, ProcessMetricsWire};
use crate::error::RpcError;

/// One frame of a response stream. Unary calls send exactly one `Response`
/// (other than `Error`); streaming calls send one per tick until the
/// client cancels or the connection drops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum Response {
    State { state: DaemonStateWire },
    Processes { processes: Vec<ProcessMetricsWire> },
    Process { process: ProcessMetricsWire },
    ProcessMetric { metric: ProcessMetricsWire },
    SystemMetrics { system: SystemState },
    Health { service: String, serving: bool },
    Stopped { service_name: String },
    Cancelled,
    Error { error: RpcError },
}

impl From<RpcError> for Response {
    fn from(error: RpcError) -> Self {
        Response::Error { error }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
