//! The shape of a sparse-pattern row as handed to the kernel and the
//! per-equation capability providers. The concrete `OfflineData`/
//! `SparsityPattern` that produces these views lives in `hv-offline`;
//! this crate only fixes the borrowed shape so `hv-equations`,
//! `hv-riemann`, `hv-limiter` and `hv-kernel` can all depend on it without
//! depending on each other or on the (out-of-scope) mesh layer.

use crate::state::StateArray;
use crate::NodeIndex;

/// One row of the sparse stencil: the one-ring `I(i)` of node `i`.
///
/// `columns[0]` is always `i` itself . `c_ij[k]` and
/// `norm_cij[k]` correspond to `columns[k]`; `c_ij` is stored as 3-vectors
/// regardless of problem dimension, with trailing components zero in 1-D/2-D.
#[derive(Clone, Copy)]
pub struct SparseRowView<'a> {
    pub columns: &'a [NodeIndex],
    pub c_ij: &'a [[f64; 3]],
    pub norm_cij: &'a [f64],
}

impl<'a> SparseRowView<'a> {
    pub fn row_length(&self) -> usize {
        self.columns.len()
    }

    /// A stencil row of length 1 is a constrained degree of freedom
    /// (hanging node or Dirichlet) and must be skipped by every sweep.
    pub fn is_constrained(&self) -> bool {
        self.columns.len() <= 1
    }

    pub fn self_index(&self) -> NodeIndex {
        self.columns[0]
    }

    /// Iterate `(j, c_ij, n_ij)` for `j != i` only (the "full row" walk).
    pub fn neighbors(&self) -> impl Iterator<Item = (NodeIndex, [f64; 3], [f64; 3])> + 'a {
        let c_ij = self.c_ij;
        let norm = self.norm_cij;
        self.columns
            .iter()
            .copied()
            .zip(c_ij.iter().copied())
            .zip(norm.iter().copied())
            .skip(1)
            .map(move |((j, c), n)| {
                let nij = if n > 0.0 {
                    [c[0] / n, c[1] / n, c[2] / n]
                } else {
                    [0.0, 0.0, 0.0]
                };
                (j, c, nij)
            })
    }
}

/// Boundary condition kinds a `HyperbolicSystemView` must be able to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryId {
    Dirichlet,
    DirichletMomentum,
    Slip,
    NoSlip,
    Dynamic,
}

/// Per-boundary-node geometric and prescribed-state data (from the
/// mesh's boundary map).
#[derive(Clone, Copy, Debug)]
pub struct BoundaryData {
    pub id: BoundaryId,
    pub normal: [f64; 3],
    pub normal_mass: f64,
    pub boundary_mass: f64,
    pub position: [f64; 3],
    /// Externally supplied state for `Dirichlet`/`DirichletMomentum`
    /// conditions, e.g. sampled from an initial-values object at
    /// `position`. Ignored by `Slip`/`NoSlip`/`Dynamic`.
    pub prescribed: StateArray,
}
