// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sv stop <name>`: request a graceful stop with a deadline.

use anyhow::Result;
use sv_rpc::{Request, Response};

use crate::client::{ok_or_rpc_error, DaemonClient};

pub async fn run(client: &mut DaemonClient, service_name: String, deadline_ms: u64) -> Result<()> {
    let response =
        ok_or_rpc_error(client.call(Request::Stop { service_name, deadline_ms }).await?)?;
    match response {
        Response::Stopped { service_name } => {
            println!("stopped {service_name}");
            Ok(())
        }
        other => anyhow::bail!("unexpected response to Stop: {other:?}"),
    }
}
