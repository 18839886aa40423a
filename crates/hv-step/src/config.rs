//! Step-controller configuration.

use hv_core::Real;

/// What the controller does when an accepted step's admissibility check
/// fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdViolationStrategy {
    /// Count the violation and continue with the (possibly inadmissible)
    /// result — used for diagnostics runs that tolerate occasional breaches.
    Warn,
    /// Emit `StepOutcome::Restart` instead of returning the step's result.
    RaiseException,
}

impl Default for IdViolationStrategy {
    fn default() -> Self {
        IdViolationStrategy::Warn
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepConfig {
    /// Scales the kernel's `tau_max` before it becomes the step's `tau`.
    pub cfl_number: Real,
    pub id_violation_strategy: IdViolationStrategy,
    /// `N_iter` successive limiter passes.
    pub limiter_iterations: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            cfl_number: 1.0,
            id_violation_strategy: IdViolationStrategy::Warn,
            limiter_iterations: 2,
        }
    }
}
