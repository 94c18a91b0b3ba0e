// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sv_core::ServiceName;
use thiserror::Error;

use crate::depgraph::DepGraphError;

/// Errors surfaced by the `Supervisor`'s public operations.
///
/// Only [`SupervisorError::DuplicateService`] and
/// [`SupervisorError::DependencyGraph`] are fatal invariant violations; the
/// rest are recoverable and returned to the caller.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("service {0} is already registered")]
    DuplicateService(ServiceName),
    #[error("service {0} not found")]
    NotFound(ServiceName),
    #[error(transparent)]
    DependencyGraph(#[from] DepGraphError),
    #[error("failed to spawn {service}: {source}")]
    Spawn { service: ServiceName, #[source] source: std::io::Error },
    #[error("spawn task for {service} panicked: {source}")]
    SpawnTaskPanicked { service: ServiceName, #[source] source: tokio::task::JoinError },
}
