// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires `sv_supervisor::Supervisor` into the Aggregator's `ProcessSource`
//! capability without the Aggregator depending on the Supervisor's clock
//! type parameter.

use crate::aggregator::ProcessSource;
use sv_core::{Clock, ProcessMetrics};
use sv_supervisor::Supervisor;

impl<C: Clock + 'static> ProcessSource for Supervisor<C> {
    fn process_metrics(&self) -> Vec<ProcessMetrics> {
        self.get_all_process_metrics()
    }
}
