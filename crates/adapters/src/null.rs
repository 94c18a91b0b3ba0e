// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Degrade-to-`None` mesh and Kubernetes providers, for daemons running
//! standalone with no service mesh or orchestrator facet configured.

use sv_aggregator::providers::{KubernetesProvider, MeshProvider};
use sv_core::{KubernetesState, MeshTopology};

#[derive(Debug, Default, Clone, Copy)]
pub struct NullMeshProvider;

impl MeshProvider for NullMeshProvider {
    fn topology(&self) -> Option<MeshTopology> {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullKubernetesProvider;

impl KubernetesProvider for NullKubernetesProvider {
    fn state(&self) -> Option<KubernetesState> {
        None
    }
}
