//! hv-riemann: the approximate Riemann solver.

pub mod config;
pub mod error;
pub mod newton;
pub mod solver;

pub use config::RiemannConfig;
pub use error::{RiemannError, RiemannResultT};
pub use solver::{GuermondPopovSolver, NoopRiemannSolver};
