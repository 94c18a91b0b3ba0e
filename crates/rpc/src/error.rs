// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Surfaced to RPC callers; never leaks `std::io::Error` or internal error
/// types directly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("service {0} not found")]
    NotFound(String),
    #[error("call was cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}
