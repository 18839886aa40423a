//! hv-offline: the `OfflineData` collaborator.
//!
//! Mesh generation and finite-element assembly are explicitly out of scope
//!  — this crate only defines the read-only view the update
//! loop consumes (`sparsity.rs`, `offline_data.rs`) plus a minimal
//! in-memory Cartesian mesh builder (`builder.rs`) used exclusively by
//! tests, benches and CLI demo seeds.

pub mod builder;
pub mod error;
pub mod offline_data;
pub mod sparsity;

pub use builder::{Line1DBuilder, Ring1DBuilder};
pub use error::{OfflineError, OfflineResult};
pub use offline_data::{InMemoryOfflineData, OfflineData};
pub use sparsity::{NodePartition, SparsityPattern};
