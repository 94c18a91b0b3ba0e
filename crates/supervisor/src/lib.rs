// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sv-supervisor: the process supervision loop — Process Entry state
//! machine, zombie reaper, dependency ordering, and the Supervisor command
//! dispatcher that owns them.

pub mod depgraph;
pub mod entry;
pub mod error;
pub mod reaper;
pub mod supervisor;

pub use depgraph::{start_order, stop_order, DepGraphError};
pub use entry::{ExitStatus, ProcessEntry, ProcessSpec, StopStep};
pub use error::SupervisorError;
pub use reaper::{ReapedChild, Reaper};
pub use supervisor::Supervisor;
