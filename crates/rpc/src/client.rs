// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin request/response helpers for `sv-cli`. The CLI only ever makes a
//! unary call or reads one stream frame at a time — it owns no retry or
//! reconnect policy, and never touches the wire codec directly.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::request::Request;
use crate::response::Response;
use crate::wire::{self, ProtocolError};

/// Sends one `Request` and reads back exactly one `Response` frame. For a
/// streaming request, the caller is expected to keep calling `read_frame`
/// on the same connection for subsequent ticks.
pub async fn call<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut S,
    request: &Request,
) -> Result<Response, ProtocolError> {
    wire::write_frame(stream, request).await?;
    wire::read_frame(stream).await
}

pub async fn send_cancel<S: AsyncWrite + Unpin>(stream: &mut S) -> Result<(), ProtocolError> {
    wire::write_frame(stream, &Request::Cancel).await
}
