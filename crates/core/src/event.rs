// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle event types published on the event bus.

use crate::service::ServiceName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Process-category event edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessEvent {
    Started,
    Stopped,
    Failed,
    Restarted,
    Healthy,
    Unhealthy,
}

/// Mesh-category event edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshEvent {
    NodeUp,
    NodeDown,
    LeaderChanged,
    TopologyChanged,
}

/// Kubernetes-category event edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KubernetesEvent {
    PodCreated,
    PodDeleted,
    PodReady,
    PodFailed,
}

/// System-category event edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemEvent {
    CpuHigh,
    MemoryHigh,
    DiskFull,
}

/// Daemon-category event edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonEvent {
    Started,
    Stopping,
    ConfigReloaded,
}

/// Closed set of event types across five categories, plus `Unknown` for
/// forward-compatibility with future wire producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EventType {
    Process(ProcessEvent),
    Mesh(MeshEvent),
    Kubernetes(KubernetesEvent),
    System(SystemEvent),
    Daemon(DaemonEvent),
    Unknown,
}

impl EventType {
    /// Pure function of `Type`: the first segment of the dotted textual
    /// form.
    pub fn category(&self) -> &'static str {
        match self {
            EventType::Process(_) => "process",
            EventType::Mesh(_) => "mesh",
            EventType::Kubernetes(_) => "kubernetes",
            EventType::System(_) => "system",
            EventType::Daemon(_) => "daemon",
            EventType::Unknown => "unknown",
        }
    }

    /// Dotted, ASCII, lower-case textual form, e.g. `"process.started"`.
    pub fn name(&self) -> String {
        let leaf = match self {
            EventType::Process(e) => match e {
                ProcessEvent::Started => "started",
                ProcessEvent::Stopped => "stopped",
                ProcessEvent::Failed => "failed",
                ProcessEvent::Restarted => "restarted",
                ProcessEvent::Healthy => "healthy",
                ProcessEvent::Unhealthy => "unhealthy",
            },
            EventType::Mesh(e) => match e {
                MeshEvent::NodeUp => "node.up",
                MeshEvent::NodeDown => "node.down",
                MeshEvent::LeaderChanged => "leader.changed",
                MeshEvent::TopologyChanged => "topology.changed",
            },
            EventType::Kubernetes(e) => match e {
                KubernetesEvent::PodCreated => "pod.created",
                KubernetesEvent::PodDeleted => "pod.deleted",
                KubernetesEvent::PodReady => "pod.ready",
                KubernetesEvent::PodFailed => "pod.failed",
            },
            EventType::System(e) => match e {
                SystemEvent::CpuHigh => "cpu.high",
                SystemEvent::MemoryHigh => "memory.high",
                SystemEvent::DiskFull => "disk.full",
            },
            EventType::Daemon(e) => match e {
                DaemonEvent::Started => "started",
                DaemonEvent::Stopping => "stopping",
                DaemonEvent::ConfigReloaded => "config.reloaded",
            },
            EventType::Unknown => return "unknown".to_string(),
        };
        format!("{}.{leaf}", self.category())
    }
}

/// Small scalar variant for the `Data` map. Widened with a discriminated
/// variant rather than a language-specific "any" without a runtime-checkable
/// type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Str(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Str(s)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

/// A single immutable lifecycle event.
///
/// `id` is assigned by the event bus at publish time and is monotonically
/// increasing across the bus's lifetime; it is never reused, so subscribers
/// can detect drops via gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub ty: EventType,
    pub timestamp_ms: u64,
    pub service_name: Option<ServiceName>,
    pub node_id: Option<String>,
    pub pod_name: Option<String>,
    pub message: String,
    pub data: HashMap<String, DataValue>,
}

impl Event {
    /// Construct an event with `id` left at `0`; the bus overwrites it at
    /// publish time (see `sv_bus::EventBus::publish`).
    pub fn new(ty: EventType, timestamp_ms: u64) -> Self {
        Self {
            id: 0,
            ty,
            timestamp_ms,
            service_name: None,
            node_id: None,
            pod_name: None,
            message: String::new(),
            data: HashMap::new(),
        }
    }

    pub fn with_service(mut self, name: ServiceName) -> Self {
        self.service_name = Some(name);
        self
    }

    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_pod(mut self, pod_name: impl Into<String>) -> Self {
        self.pod_name = Some(pod_name.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn category(&self) -> &'static str {
        self.ty.category()
    }

    pub fn name(&self) -> String {
        self.ty.name()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
