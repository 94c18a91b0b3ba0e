// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sv show <name>`: full detail on one service.

use anyhow::Result;
use sv_rpc::{Request, Response};

use crate::client::{ok_or_rpc_error, DaemonClient};
use crate::output::OutputFormat;

pub async fn run(client: &mut DaemonClient, service_name: String, format: OutputFormat) -> Result<()> {
    let response =
        ok_or_rpc_error(client.call(Request::GetProcess { service_name }).await?)?;
    let Response::Process { process } = response else {
        anyhow::bail!("unexpected response to GetProcess");
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&process)?),
        OutputFormat::Text => {
            println!("{}: {}", crate::color::header("name"), process.service_name);
            println!("{}: {}", crate::color::header("state"), format!("{:?}", process.state));
            println!("{}: {}", crate::color::header("pid"), process.pid);
            println!("{}: {}", crate::color::header("healthy"), process.healthy);
            println!("{}: {}", crate::color::header("restarts"), process.restart_count);
            println!(
                "{}: {}",
                crate::color::header("uptime"),
                crate::output::format_duration_ms(process.uptime_ms)
            );
            println!("{}: {} bytes", crate::color::header("rss"), process.memory.rss);
            println!("{}: {} ns", crate::color::header("cpu (total)"), process.cpu.total_ns);
            if let Some(err) = &process.last_error {
                println!("{}: {err}", crate::color::header("last error"));
            }
        }
    }
    Ok(())
}
