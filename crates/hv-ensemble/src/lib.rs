//! hv-ensemble: cross-process reduction and ghost exchange.

pub mod reducer;

#[cfg(feature = "mpi-backend")]
pub mod mpi_backend;

pub use reducer::{EnsembleReducer, SingleRankReducer};

#[cfg(feature = "mpi-backend")]
pub use mpi_backend::MpiReducer;
