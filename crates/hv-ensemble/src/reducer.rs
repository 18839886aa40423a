//! Cross-process reduction and ghost exchange . One
//! trait, two backends: `SingleRankReducer` (default, in-process identity)
//! and the optional `mpi` feature's `MpiReducer` — mirrors the
//! native/PETSc backend split in the solver-backend layer of the adjacent
//! FE pack, just with the default and optional roles swapped (MPI is the
//! scale-out case here, not the default).

use hv_core::{NodeIndex, Real, StateVector};

/// Reduces `tau_max` across ranks and exchanges ghost-node state. `hv-step`
/// only ever holds a `&dyn EnsembleReducer`, so it never branches on which
/// backend is active.
pub trait EnsembleReducer: Send + Sync {
    fn min_reduce_tau_max(&self, local_tau_max: Real) -> Real;

    /// Overwrites the ghost range of `state` (`partition.ghost_range()`)
    /// with the owning rank's current values for those nodes.
    fn update_ghost_values(&self, state: &mut StateVector, ghost_nodes: &[NodeIndex]);

    /// Collects a single node's state from whichever rank owns it. Used
    /// only by diagnostics/output, never the hot loop.
    fn gather_owned(&self, state: &StateVector, node: NodeIndex) -> Option<[Real; hv_core::MAX_COMPONENTS]>;
}

/// No-op single-process reducer: every test and the CLI run this way.
pub struct SingleRankReducer;

impl EnsembleReducer for SingleRankReducer {
    fn min_reduce_tau_max(&self, local_tau_max: Real) -> Real {
        local_tau_max
    }

    fn update_ghost_values(&self, _state: &mut StateVector, _ghost_nodes: &[NodeIndex]) {
        // Single rank owns every node; there is no ghost range to refresh.
    }

    fn gather_owned(&self, state: &StateVector, node: NodeIndex) -> Option<[Real; hv_core::MAX_COMPONENTS]> {
        let mut out = [0.0; hv_core::MAX_COMPONENTS];
        state.get(node, &mut out);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rank_reducer_is_identity() {
        let reducer = SingleRankReducer;
        assert_eq!(reducer.min_reduce_tau_max(0.42), 0.42);
    }

    #[test]
    fn single_rank_reducer_gathers_local_state() {
        let mut state = StateVector::zeros(2, 3);
        let u = [1.0, 2.0, 0.0, 0.0, 0.0];
        state.set(NodeIndex::from_index(1), &u);
        let reducer = SingleRankReducer;
        let out = reducer.gather_owned(&state, NodeIndex::from_index(1)).unwrap();
        assert_eq!(&out[..2], &u[..2]);
    }
}
