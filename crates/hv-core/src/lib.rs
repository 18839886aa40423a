//! hv-core: stable foundation for the hyperbolic update loop.
//!
//! Contains:
//! - numeric (Real, tolerances, safe-math helpers)
//! - error (shared error taxonomy)
//! - ids (stable node indices)
//! - state / precomputed (structure-of-arrays storage)
//! - sparse (the borrowed shape of a sparsity-pattern row, boundary data)
//! - equation (the four per-equation capability providers + `Equation` trait)

pub mod equation;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod precomputed;
pub mod sparse;
pub mod state;

pub use equation::{
    Equation, HyperbolicSystemView, Indicator, Limiter, LimiterBounds, NoParabolic,
    ParabolicCollaborator, RiemannPrimitive1D, RiemannResult, RiemannSolver,
};
pub use error::{HvError, HvResult};
pub use ids::NodeIndex;
pub use numeric::{
    nearly_equal, positive_part, safe_division, safe_sqrt, FloatTolerance, Real, Tolerances,
};
pub use precomputed::{PrecomputedArray, PrecomputedVector, MAX_PRECOMPUTED};
pub use sparse::{BoundaryData, BoundaryId, SparseRowView};
pub use state::{StateArray, StateVector, MAX_COMPONENTS};
