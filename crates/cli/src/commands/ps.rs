// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sv ps`: one line per supervised service.

use anyhow::Result;
use sv_rpc::{DaemonStateWire, Request, Response};

use crate::client::{ok_or_rpc_error, DaemonClient};
use crate::output::OutputFormat;

pub async fn run(client: &mut DaemonClient, format: OutputFormat) -> Result<()> {
    let response = ok_or_rpc_error(client.call(Request::GetState).await?)?;
    let Response::State { state } = response else {
        anyhow::bail!("unexpected response to GetState");
    };
    print_table(&state, format)
}

fn print_table(state: &DaemonStateWire, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<20} {:>8} {:<10} {:<8} {:>10} {:>12}",
                crate::color::header("NAME"),
                crate::color::header("PID"),
                crate::color::header("STATE"),
                crate::color::header("HEALTHY"),
                crate::color::header("RESTARTS"),
                crate::color::header("UPTIME"),
            );
            for process in &state.processes {
                println!(
                    "{:<20} {:>8} {:<10} {:<8} {:>10} {:>12}",
                    process.service_name,
                    process.pid,
                    format!("{:?}", process.state),
                    process.healthy,
                    process.restart_count,
                    crate::output::format_duration_ms(process.uptime_ms),
                );
            }
        }
    }
    Ok(())
}
