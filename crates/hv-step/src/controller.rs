//! The step controller : drives one explicit update --
//! precompute, graph viscosity + `tau_max`, low-order update, high-order
//! antidiffusive-flux assembly with iterated limiting -- and reconciles an
//! invariant-domain violation into either a counted warning or a typed
//! `Restart` the caller must retry with a smaller `tau`.

use std::sync::atomic::{AtomicU64, Ordering};

use hv_core::{
    HyperbolicSystemView, Indicator, Limiter, NodeIndex, Real, RiemannSolver, StateVector,
};
use hv_ensemble::EnsembleReducer;
use hv_kernel::{compute_tau_max, high_order_limited_update, low_order_update, precompute};
use hv_offline::OfflineData;

use crate::config::{IdViolationStrategy, StepConfig};
use crate::error::StepResult;

/// Why the controller emitted `StepOutcome::Restart` instead of an accepted
/// step.
#[derive(Clone, Copy, Debug)]
pub enum RestartReason {
    /// The caller's requested `tau` exceeds the CFL-admissible `tau_max`.
    CflExceeded { requested: Real, tau_max: Real },
    /// The post-limiter state violates admissibility at an owned node.
    InadmissibleState { node: usize },
}

/// Result of one `StepController::step` call. `Restart` is a typed
/// sentinel, not an error value : the caller is expected to
/// retry with a reduced `tau`/CFL rather than treat it as a failure.
pub enum StepOutcome {
    Accepted {
        tau: Real,
        state: StateVector,
        /// Per-node indicator blend weight used this step.
        alpha: Vec<Real>,
    },
    Restart(RestartReason),
}

/// One read-only RK stage contribution and its weight.
pub type RkStage<'a> = (&'a StateVector, Real);

/// Binds the four per-equation capability providers plus the ensemble
/// reducer for one instantiated `(dimension, equation)` pair and drives
/// `step` . A pure orchestrator: no physics of its own, only
/// sequencing and the accept/restart decision.
pub struct StepController<S, R, I, L> {
    pub system: S,
    pub riemann: R,
    pub indicator: I,
    pub limiter: L,
    pub config: StepConfig,
    n_restarts: AtomicU64,
    n_warnings: AtomicU64,
}

impl<S, R, I, L> StepController<S, R, I, L>
where
    S: HyperbolicSystemView,
    R: RiemannSolver<S>,
    I: Indicator<S>,
    L: Limiter<S>,
{
    pub fn new(system: S, riemann: R, indicator: I, limiter: L, config: StepConfig) -> Self {
        Self {
            system,
            riemann,
            indicator,
            limiter,
            config,
            n_restarts: AtomicU64::new(0),
            n_warnings: AtomicU64::new(0),
        }
    }

    pub fn n_restarts(&self) -> u64 {
        self.n_restarts.load(Ordering::Relaxed)
    }

    pub fn n_warnings(&self) -> u64 {
        self.n_warnings.load(Ordering::Relaxed)
    }

    fn restart(&self, reason: RestartReason) -> StepOutcome {
        self.n_restarts.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(reason = ?reason, "emitting restart");
        StepOutcome::Restart(reason)
    }

    fn warn_and_continue(&self, what: &str) {
        self.n_warnings.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(what, "invariant-domain violation tolerated under warn strategy");
    }

    /// First owned node (if any) whose state fails `is_admissible` under
    /// `precomputed`, used both for the low-order and post-limiter checks.
    fn first_inadmissible(
        &self,
        offline: &dyn OfflineData,
        state: &StateVector,
        precomputed: &hv_core::PrecomputedVector,
) -> Option<usize> {
        let owned = offline.partition().owned_range();
        for i in owned {
            let mut u = [0.0; hv_core::MAX_COMPONENTS];
            let mut p = [0.0; hv_core::MAX_PRECOMPUTED];
            state.get(NodeIndex::from_index(i), &mut u);
            precomputed.get(NodeIndex::from_index(i), &mut p);
            if !self.system.is_admissible(&u, &p) {
                return Some(i);
            }
        }
        None
    }

    /// Runs one step . `tau_requested` of
    /// `None` means "use the CFL-admissible `tau_max`" -- the state machine
    /// diagram's `step(tau=0)` path. Admissibility violations are resolved
    /// per `self.config.id_violation_strategy`.
    pub fn step(
        &self,
        offline: &dyn OfflineData,
        ensemble: &dyn EnsembleReducer,
        state: &StateVector,
        tau_requested: Option<Real>,
        rk_states: &[RkStage<'_>],
) -> StepResult<StepOutcome> {
        let precompute_span = tracing::debug_span!("precomputing");
        let precomputed = {
            let _enter = precompute_span.enter();
            precompute(&self.system, offline, state)
        };

        let viscosity_span = tracing::debug_span!("d_ij_tau_max");
        let tau_max_local = {
            let _enter = viscosity_span.enter();
            compute_tau_max(&self.system, &self.riemann, offline, state, &precomputed)
        };
        let tau_max = ensemble.min_reduce_tau_max(tau_max_local) * self.config.cfl_number;

        let tau = match tau_requested {
            None => tau_max,
            Some(t) if t <= tau_max => t,
            Some(t) => {
                return Ok(match self.config.id_violation_strategy {
                    IdViolationStrategy::RaiseException => {
                        self.restart(RestartReason::CflExceeded { requested: t, tau_max })
                    }
                    IdViolationStrategy::Warn => {
                        self.warn_and_continue("requested tau exceeds tau_max");
                        tau_max
                    }
                });
            }
        };

        let low_order_span = tracing::debug_span!("low_order");
        let low_order = {
            let _enter = low_order_span.enter();
            low_order_update(&self.system, &self.riemann, offline, state, &precomputed, tau)
        };

        if let Some(node) = self.first_inadmissible(offline, &low_order, &precomputed) {
            match self.config.id_violation_strategy {
                IdViolationStrategy::RaiseException => {
                    return Ok(self.restart(RestartReason::InadmissibleState { node }));
                }
                IdViolationStrategy::Warn => {
                    self.warn_and_continue("low-order state inadmissible");
                }
            }
        }

        let high_order_span = tracing::debug_span!("high_order_limit");
        let (mut limited, alpha) = {
            let _enter = high_order_span.enter();
            high_order_limited_update(
                &self.system,
                &self.riemann,
                &self.indicator,
                &self.limiter,
                offline,
                state,
                &precomputed,
                &low_order,
                rk_states,
                tau,
                self.config.limiter_iterations,
)
        };

        if let Some(node) = self.first_inadmissible(offline, &limited, &precomputed) {
            match self.config.id_violation_strategy {
                IdViolationStrategy::RaiseException => {
                    return Ok(self.restart(RestartReason::InadmissibleState { node }));
                }
                IdViolationStrategy::Warn => {
                    self.warn_and_continue("high-order state inadmissible");
                }
            }
        }

        let ghost_nodes: Vec<NodeIndex> = offline
            .partition()
            .ghost_range()
            .map(NodeIndex::from_index)
            .collect();
        ensemble.update_ghost_values(&mut limited, &ghost_nodes);

        Ok(StepOutcome::Accepted { tau, state: limited, alpha })
    }
}

impl std::fmt::Debug for RestartReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestartReason::CflExceeded { requested, tau_max } => f
                .debug_struct("CflExceeded")
                .field("requested", requested)
                .field("tau_max", tau_max)
                .finish(),
            RestartReason::InadmissibleState { node } => {
                f.debug_struct("InadmissibleState").field("node", node).finish()
            }
        }
    }
}
