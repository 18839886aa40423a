//! hv-step: the step controller  that sequences precompute,
//! graph viscosity, low-order update, and high-order limiting into one
//! explicit step, with the accept/restart invariant-domain state machine.

pub mod config;
pub mod controller;
pub mod error;

pub use config::{IdViolationStrategy, StepConfig};
pub use controller::{RestartReason, RkStage, StepController, StepOutcome};
pub use error::{StepError, StepResult};
