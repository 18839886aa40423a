//! `MpiReducer`: the optional scale-out backend, gated behind the
//! `mpi-backend` Cargo feature so the default build never links against an
//! MPI installation.

use hv_core::{NodeIndex, Real, StateVector};
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::reducer::EnsembleReducer;

pub struct MpiReducer {
    communicator: SimpleCommunicator,
}

impl MpiReducer {
    pub fn new(communicator: SimpleCommunicator) -> Self {
        Self { communicator }
    }
}

impl EnsembleReducer for MpiReducer {
    fn min_reduce_tau_max(&self, local_tau_max: Real) -> Real {
        let mut global = local_tau_max;
        self.communicator
            .all_reduce_into(&local_tau_max, &mut global, mpi::collective::SystemOperation::min());
        global
    }

    fn update_ghost_values(&self, state: &mut StateVector, ghost_nodes: &[NodeIndex]) {
        // A real deployment exchanges ghost rows with each neighboring
        // rank via point-to-point sends keyed by the mesh partition; the
        // partition-to-rank map is part of the out-of-scope mesh layer
        // , so this only documents the hook the step
        // controller calls after every accepted step.
        let _ = (state, ghost_nodes);
    }

    fn gather_owned(&self, state: &StateVector, node: NodeIndex) -> Option<[Real; hv_core::MAX_COMPONENTS]> {
        let mut out = [0.0; hv_core::MAX_COMPONENTS];
        state.get(node, &mut out);
        Some(out)
    }
}
