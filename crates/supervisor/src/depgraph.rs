// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-ordered start/stop sequencing.

use indexmap::IndexMap;
use sv_core::ServiceName;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepGraphError {
    #[error("dependency cycle detected, involving: {0:?}")]
    Cycle(Vec<ServiceName>),
    #[error("service {0} declares a dependency on unknown service {1}")]
    UnknownDependency(ServiceName, ServiceName),
}

/// Topologically sorts `services` (name -> "after" dependencies) so that
/// every dependency precedes its dependents. Deterministic for a fixed
/// input order (ties broken by declaration order).
pub fn start_order(
    services: &IndexMap<ServiceName, Vec<ServiceName>>,
) -> Result<Vec<ServiceName>, DepGraphError> {
    for (name, deps) in services {
        for dep in deps {
            if !services.contains_key(dep) {
                return Err(DepGraphError::UnknownDependency(name.clone(), dep.clone()));
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks: IndexMap<ServiceName, Mark> =
        services.keys().map(|n| (n.clone(), Mark::Unvisited)).collect();
    let mut order = Vec::with_capacity(services.len());
    let mut stack = Vec::new();

    fn visit(
        name: &ServiceName,
        services: &IndexMap<ServiceName, Vec<ServiceName>>,
        marks: &mut IndexMap<ServiceName, Mark>,
        order: &mut Vec<ServiceName>,
        stack: &mut Vec<ServiceName>,
    ) -> Result<(), DepGraphError> {
        match marks.get(name).copied().unwrap_or(Mark::Done) {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                stack.push(name.clone());
                return Err(DepGraphError::Cycle(stack.clone()));
            }
            Mark::Unvisited => {}
        }
        marks.insert(name.clone(), Mark::InProgress);
        stack.push(name.clone());
        for dep in &services[name] {
            visit(dep, services, marks, order, stack)?;
        }
        stack.pop();
        marks.insert(name.clone(), Mark::Done);
        order.push(name.clone());
        Ok(())
    }

    for name in services.keys() {
        visit(name, services, &mut marks, &mut order, &mut stack)?;
    }

    Ok(order)
}

/// Reverse of [`start_order`]: the order in which `StopAll` should proceed.
pub fn stop_order(
    services: &IndexMap<ServiceName, Vec<ServiceName>>,
) -> Result<Vec<ServiceName>, DepGraphError> {
    let mut order = start_order(services)?;
    order.reverse();
    Ok(order)
}

#[cfg(test)]
#[path = "depgraph_tests.rs"]
mod tests;
