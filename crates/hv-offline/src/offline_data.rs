//! The `OfflineData` collaborator view : lumped mass, the
//! sparsity pattern, the boundary map, and owner/ghost partition ranges.
//! Mesh generation and finite-element assembly that would *produce* these
//! values are out of scope ; this crate only defines the
//! read-only interface the core consumes and a minimal in-memory
//! implementation used by tests, benches and CLI demos.

use crate::error::{OfflineError, OfflineResult};
use crate::sparsity::{NodePartition, SparsityPattern};
use hv_core::{BoundaryData, NodeIndex};
use std::collections::HashMap;

/// Read-only view the update loop consumes each step. Implemented by
/// `InMemoryOfflineData`; a real mesh/FE backend would implement the same
/// trait without the core ever knowing the difference.
pub trait OfflineData: Send + Sync {
    fn sparsity(&self) -> &SparsityPattern;
    fn lumped_mass(&self) -> &[f64];
    fn boundary(&self, i: NodeIndex) -> Option<&BoundaryData>;
    fn partition(&self) -> NodePartition {
        self.sparsity().partition()
    }
}

/// A simple, fully in-memory `OfflineData`, built by `hv-offline::builder`
/// Cartesian mesh generators. Never used by `hv-kernel`/`hv-step`
/// themselves (they only see `&dyn OfflineData`) — only by tests and the
/// CLI demo seeds.
#[derive(Clone, Debug)]
pub struct InMemoryOfflineData {
    sparsity: SparsityPattern,
    lumped_mass: Vec<f64>,
    boundary: HashMap<usize, BoundaryData>,
}

impl InMemoryOfflineData {
    pub fn new(
        sparsity: SparsityPattern,
        lumped_mass: Vec<f64>,
        boundary: HashMap<usize, BoundaryData>,
) -> OfflineResult<Self> {
        if lumped_mass.len() != sparsity.num_nodes() {
            return Err(OfflineError::InvalidMesh {
                what: "lumped mass length must match node count",
            });
        }
        for (index, &m) in lumped_mass.iter().enumerate() {
            if m <= 0.0 {
                return Err(OfflineError::NonPositiveMass { index });
            }
        }
        Ok(Self {
            sparsity,
            lumped_mass,
            boundary,
        })
    }
}

impl OfflineData for InMemoryOfflineData {
    fn sparsity(&self) -> &SparsityPattern {
        &self.sparsity
    }

    fn lumped_mass(&self) -> &[f64] {
        &self.lumped_mass
    }

    fn boundary(&self, i: NodeIndex) -> Option<&BoundaryData> {
        self.boundary.get(&i.index())
    }
}
