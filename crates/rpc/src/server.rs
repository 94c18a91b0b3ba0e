// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RpcServer`: dispatches one connection's request/response frames against
//! the Aggregator's latest snapshot and the Supervisor's command surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::sleep;

use sv_aggregator::Aggregator;
use sv_core::{Clock, ServiceName};
use sv_supervisor::Supervisor;

use crate::dto::{DaemonStateWire, ProcessMetricsWire};
use crate::error::RpcError;
use crate::request::Request;
use crate::response::Response;
use crate::wire::{self, ProtocolError};

/// Streaming interval floor: protects the Aggregator from being driven
/// faster than this by a misbehaving or malicious client.
pub const MIN_STREAM_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(1);

pub const DAEMON_SERVICE: &str = "DaemonService";
pub const METRICS_SERVICE: &str = "MetricsService";
pub const GLOBAL_SERVICE: &str = "";

fn effective_interval(requested_ms: u64) -> Duration {
    if requested_ms == 0 {
        DEFAULT_STREAM_INTERVAL
    } else {
        Duration::from_millis(requested_ms).max(MIN_STREAM_INTERVAL)
    }
}

enum Tick {
    Due,
    Cancelled,
}

pub struct RpcServer<C: Clock> {
    aggregator: Arc<Aggregator<C>>,
    supervisor: Arc<Supervisor<C>>,
    health: RwLock<HashMap<String, bool>>,
}

impl<C: Clock + 'static> RpcServer<C> {
    pub fn new(aggregator: Arc<Aggregator<C>>, supervisor: Arc<Supervisor<C>>) -> Self {
        let mut health = HashMap::new();
        health.insert(DAEMON_SERVICE.to_string(), true);
        health.insert(METRICS_SERVICE.to_string(), true);
        health.insert(GLOBAL_SERVICE.to_string(), true);
        Self { aggregator, supervisor, health: RwLock::new(health) }
    }

    /// Flips every health entry to not-serving ahead of a graceful stop,
    /// so new clients see unhealthy before any service actually goes down.
    pub fn mark_shutting_down(&self) {
        for serving in self.health.write().values_mut() {
            *serving = false;
        }
    }

    fn snapshot(&self) -> Result<DaemonStateWire, RpcError> {
        self.aggregator
            .current()
            .map(|state| DaemonStateWire::from(state.as_ref()))
            .ok_or_else(|| RpcError::Internal("no snapshot collected yet".to_string()))
    }

    fn process(&self, service_name: &str) -> Result<ProcessMetricsWire, RpcError> {
        let state = self
            .aggregator
            .current()
            .ok_or_else(|| RpcError::Internal("no snapshot collected yet".to_string()))?;
        state
            .process(service_name)
            .map(ProcessMetricsWire::from)
            .ok_or_else(|| RpcError::NotFound(service_name.to_string()))
    }

    /// Drives one connection end to end: reads requests, writes responses,
    /// and for streaming calls ticks on `interval` until the client sends
    /// `Cancel`, sends any other frame, or disconnects.
    pub async fn run_connection<S>(&self, stream: S) -> Result<(), ProtocolError>
    where
        S: AsyncRead + AsyncWrite,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);
        loop {
            let request: Request = match wire::read_frame(&mut reader).await {
                Ok(r) => r,
                Err(ProtocolError::Truncated) => return Ok(()),
                Err(e) => return Err(e),
            };

            match request {
                Request::Cancel => continue,
                Request::GetState => {
                    let response = match self.snapshot() {
                        Ok(state) => Response::State { state },
                        Err(e) => e.into(),
                    };
                    wire::write_frame(&mut writer, &response).await?;
                }
                Request::ListProcesses => {
                    let response = match self.snapshot() {
                        Ok(state) => Response::Processes { processes: state.processes },
                        Err(e) => e.into(),
                    };
                    wire::write_frame(&mut writer, &response).await?;
                }
                Request::GetProcess { service_name } => {
                    let response = match self.process(&service_name) {
                        Ok(process) => Response::Process { process },
                        Err(e) => e.into(),
                    };
                    wire::write_frame(&mut writer, &response).await?;
                }
                Request::GetSystemMetrics => {
                    let response = match self.snapshot() {
                        Ok(state) => Response::SystemMetrics { system: state.system },
                        Err(e) => e.into(),
                    };
                    wire::write_frame(&mut writer, &response).await?;
                }
                Request::Health { service } => {
                    let serving = self.health.read().get(&service).copied().unwrap_or(false);
                    wire::write_frame(&mut writer, &Response::Health { service, serving }).await?;
                }
                Request::Stop { service_name, deadline_ms } => {
                    let response = match ServiceName::new(&service_name) {
                        Ok(name) => {
                            match self
                                .supervisor
                                .stop(&name, Duration::from_millis(deadline_ms))
                                .await
                            {
                                Ok(()) => Response::Stopped { service_name },
                                Err(e) => RpcError::Internal(e.to_string()).into(),
                            }
                        }
                        Err(e) => RpcError::InvalidArgument(e.to_string()).into(),
                    };
                    wire::write_frame(&mut writer, &response).await?;
                }
                Request::StreamState { interval_ms } => {
                    let interval = effective_interval(interval_ms);
                    loop {
                        let response = match self.snapshot() {
                            Ok(state) => Response::State { state },
                            Err(e) => e.into(),
                        };
                        wire::write_frame(&mut writer, &response).await?;
                        if let Tick::Cancelled = wait_for_tick(&mut reader, interval).await {
                            wire::write_frame(&mut writer, &Response::Cancelled).await?;
                            break;
                        }
                    }
                }
                Request::StreamSystemMetrics { interval_ms } => {
                    let interval = effective_interval(interval_ms);
                    loop {
                        let response = match self.snapshot() {
                            Ok(state) => Response::SystemMetrics { system: state.system },
                            Err(e) => e.into(),
                        };
                        wire::write_frame(&mut writer, &response).await?;
                        if let Tick::Cancelled = wait_for_tick(&mut reader, interval).await {
                            wire::write_frame(&mut writer, &Response::Cancelled).await?;
                            break;
                        }
                    }
                }
                Request::StreamProcessMetrics { service_name, interval_ms } => {
                    let interval = effective_interval(interval_ms);
                    loop {
                        match self.process(&service_name) {
                            Ok(metric) => {
                                wire::write_frame(&mut writer, &Response::ProcessMetric { metric })
                                    .await?;
                            }
                            Err(RpcError::NotFound(_)) => {
                                // Service removed mid-stream: terminate the stream.
                                wire::write_frame(&mut writer, &Response::Cancelled).await?;
                                break;
                            }
                            Err(e) => {
                                wire::write_frame(&mut writer, &Response::from(e)).await?;
                            }
                        }
                        if let Tick::Cancelled = wait_for_tick(&mut reader, interval).await {
                            wire::write_frame(&mut writer, &Response::Cancelled).await?;
                            break;
                        }
                    }
                }
                Request::StreamAllProcessMetrics { interval_ms } => {
                    let interval = effective_interval(interval_ms);
                    loop {
                        match self.aggregator.current() {
                            Some(state) => {
                                for process in &state.processes {
                                    let metric = ProcessMetricsWire::from(process);
                                    wire::write_frame(
                                        &mut writer,
                                        &Response::ProcessMetric { metric },
                                    )
                                    .await?;
                                }
                            }
                            None => {
                                let error = RpcError::Internal("no snapshot collected yet".to_string());
                                wire::write_frame(&mut writer, &Response::from(error)).await?;
                            }
                        }
                        if let Tick::Cancelled = wait_for_tick(&mut reader, interval).await {
                            wire::write_frame(&mut writer, &Response::Cancelled).await?;
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Sleeps for `interval` unless a frame arrives first on `reader`; any
/// frame (a `Cancel`, or simply EOF) ends the stream — cancellation is
/// observed at each tick and on every send.
async fn wait_for_tick<R: AsyncRead + Unpin>(reader: &mut R, interval: Duration) -> Tick {
    tokio::select! {
        _ = sleep(interval) => Tick::Due,
        frame = wire::read_frame::<_, Request>(reader) => {
            let _ = frame;
            Tick::Cancelled
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
