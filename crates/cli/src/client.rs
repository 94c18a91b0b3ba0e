// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin connection wrapper around `sv-rpc`'s client helpers. This is the
//! only place in `sv-cli` that touches the wire protocol directly.

use anyhow::{bail, Context, Result};
use sv_rpc::{client, Request, Response};
use tokio::net::UnixStream;

pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    pub async fn connect(socket_path: &std::path::Path) -> Result<Self> {
        let stream = UnixStream::connect(socket_path)
            .await
            .with_context(|| format!("connecting to daemon socket at {}", socket_path.display()))?;
        Ok(Self { stream })
    }

    pub async fn call(&mut self, request: Request) -> Result<Response> {
        client::call(&mut self.stream, &request).await.context("daemon RPC call failed")
    }

    /// Reads one additional frame from an in-progress streaming call.
    pub async fn next_frame(&mut self) -> Result<Response> {
        sv_rpc::read_frame(&mut self.stream).await.context("reading stream frame")
    }

    pub async fn cancel(&mut self) -> Result<()> {
        client::send_cancel(&mut self.stream).await.context("sending cancel")
    }
}

/// Unwraps a `Response::Error` into an `anyhow` error, leaving any other
/// variant untouched.
pub fn ok_or_rpc_error(response: Response) -> Result<Response> {
    if let Response::Error { error } = &response {
        bail!("{error}");
    }
    Ok(response)
}
