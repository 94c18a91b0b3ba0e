// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sv events --follow`: streams `DaemonState` snapshots until interrupted
//! or the daemon closes the stream.

use anyhow::Result;
use sv_rpc::{Request, Response};

use crate::client::DaemonClient;
use crate::output::OutputFormat;

pub async fn run(client: &mut DaemonClient, interval_ms: u64, format: OutputFormat) -> Result<()> {
    let first = client.call(Request::StreamState { interval_ms }).await?;
    print_frame(&first, format)?;
    if matches!(first, Response::Cancelled | Response::Error { .. }) {
        return Ok(());
    }

    loop {
        let response = client.next_frame().await?;
        let done = matches!(response, Response::Cancelled | Response::Error { .. });
        print_frame(&response, format)?;
        if done {
            break;
        }
    }
    Ok(())
}

fn print_frame(response: &Response, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(response)?),
        OutputFormat::Text => match response {
            Response::State { state } => {
                println!(
                    "{} {} processes healthy={} uptime={}",
                    state.timestamp_ms,
                    state.processes.len(),
                    state.healthy,
                    crate::output::format_duration_ms(state.uptime_ms),
                );
            }
            Response::Cancelled => println!("(stream cancelled)"),
            Response::Error { error } => println!("(stream error: {error})"),
            other => println!("{other:?}"),
        },
    }
    Ok(())
}
