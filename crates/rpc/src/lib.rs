// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sv-rpc: length-prefixed JSON wire protocol plus the server that answers
//! it — `DaemonService`/`MetricsService` operations and the health
//! sub-protocol.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod dto;
pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod wire;

pub use dto::{DaemonStateWire, HostInfoWire, ProcessMetricsWire, StateWire};
pub use error::RpcError;
pub use request::Request;
pub use response::Response;
pub use server::{RpcServer, DAEMON_SERVICE, GLOBAL_SERVICE, METRICS_SERVICE};
pub use wire::{decode, encode, read_frame, read_message, write_frame, write_message, ProtocolError};
