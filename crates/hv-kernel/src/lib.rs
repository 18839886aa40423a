//! hv-kernel: the parallel sparse-stencil traversal and the physics
//! sweeps built on top of it.

pub mod stencil;
pub mod sweep;

pub use stencil::{active_nodes, par_for_each_row_block, symmetrize, FullRowTask, NodeTask, UpperEdgeTask};
pub use sweep::{compute_tau_max, high_order_limited_update, low_order_update, precompute};
