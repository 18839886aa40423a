//! Minimal Cartesian mesh builders used only by tests, benches and the CLI
//! demo seeds (§8 concrete scenarios). Never imported by `hv-kernel` or
//! `hv-step` — the core only ever sees `&dyn OfflineData`.
//!
//! These stand in for the out-of-scope mesh-generation/finite-element
//! assembly collaborator: a real deployment would source `OfflineData`
//! from a deal.II-style discretization instead.

use crate::error::OfflineResult;
use crate::offline_data::InMemoryOfflineData;
use crate::sparsity::{NodePartition, SparsityPattern};
use hv_core::{BoundaryData, BoundaryId, NodeIndex, MAX_COMPONENTS};
use std::collections::HashMap;

/// A 1-D chain of `n` nodes spaced `dx` apart, collocation-style
/// divergence coefficients `c_ij = +-1` on the interior (the exact
/// 1-D FE mass-lumped stencil), Dirichlet end caps.
pub struct Line1DBuilder {
    pub n: usize,
    pub dx: f64,
}

impl Line1DBuilder {
    pub fn new(n: usize, domain_length: f64) -> Self {
        assert!(n >= 2, "need at least two nodes");
        Self {
            n,
            dx: domain_length / (n - 1) as f64,
        }
    }

    pub fn build(&self) -> OfflineResult<InMemoryOfflineData> {
        let n = self.n;
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = vec![(NodeIndex::from_index(i), [0.0, 0.0, 0.0])];
            if i > 0 {
                row.push((NodeIndex::from_index(i - 1), [-0.5, 0.0, 0.0]));
            }
            if i + 1 < n {
                row.push((NodeIndex::from_index(i + 1), [0.5, 0.0, 0.0]));
            }
            rows.push(row);
        }

        let partition = NodePartition {
            simd_width: 1,
            simd_end: n,
            scalar_end: n,
            total: n,
        };
        let sparsity = SparsityPattern::from_rows(partition, rows);
        sparsity.debug_assert_divergence_free(1e-12);

        let lumped_mass = vec![self.dx; n];

        let mut boundary = HashMap::new();
        boundary.insert(
            0,
            BoundaryData {
                id: BoundaryId::Dirichlet,
                normal: [-1.0, 0.0, 0.0],
                normal_mass: 1.0,
                boundary_mass: self.dx * 0.5,
                position: [0.0, 0.0, 0.0],
                prescribed: [0.0; MAX_COMPONENTS],
            },
);
        boundary.insert(
            n - 1,
            BoundaryData {
                id: BoundaryId::Dirichlet,
                normal: [1.0, 0.0, 0.0],
                normal_mass: 1.0,
                boundary_mass: self.dx * 0.5,
                position: [(n - 1) as f64 * self.dx, 0.0, 0.0],
                prescribed: [0.0; MAX_COMPONENTS],
            },
);

        InMemoryOfflineData::new(sparsity, lumped_mass, boundary)
    }

    /// Node position along the line.
    pub fn position(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }
}

/// A periodic ring of `n` nodes (used for conservation-invariant tests,
/// where there is no boundary flux to account for).
pub struct Ring1DBuilder {
    pub n: usize,
    pub dx: f64,
}

impl Ring1DBuilder {
    pub fn new(n: usize, domain_length: f64) -> Self {
        assert!(n >= 3, "need at least three nodes for a ring");
        Self {
            n,
            dx: domain_length / n as f64,
        }
    }

    pub fn build(&self) -> OfflineResult<InMemoryOfflineData> {
        let n = self.n;
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let left = (i + n - 1) % n;
            let right = (i + 1) % n;
            let row = vec![
                (NodeIndex::from_index(i), [0.0, 0.0, 0.0]),
                (NodeIndex::from_index(left), [-0.5, 0.0, 0.0]),
                (NodeIndex::from_index(right), [0.5, 0.0, 0.0]),
            ];
            rows.push(row);
        }

        let partition = NodePartition {
            simd_width: 1,
            simd_end: n,
            scalar_end: n,
            total: n,
        };
        let sparsity = SparsityPattern::from_rows(partition, rows);
        sparsity.debug_assert_divergence_free(1e-12);

        let lumped_mass = vec![self.dx; n];
        InMemoryOfflineData::new(sparsity, lumped_mass, HashMap::new())
    }

    pub fn position(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_mesh_has_dirichlet_end_caps() {
        let data = Line1DBuilder::new(11, 1.0).build().unwrap();
        assert!(data.boundary(NodeIndex::from_index(0)).is_some());
        assert!(data.boundary(NodeIndex::from_index(10)).is_some());
        assert!(data.boundary(NodeIndex::from_index(5)).is_none());
    }

    #[test]
    fn ring_mesh_has_no_boundary() {
        let data = Ring1DBuilder::new(10, 1.0).build().unwrap();
        for i in 0..10 {
            assert!(data.boundary(NodeIndex::from_index(i)).is_none());
        }
    }

    #[test]
    fn ring_mesh_row_length_is_three() {
        let data = Ring1DBuilder::new(10, 1.0).build().unwrap();
        for i in 0..10 {
            assert_eq!(data.sparsity().row_length(i), 3);
        }
    }
}
