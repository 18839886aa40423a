//! The equation registry : one `Box<dyn ErasedEquation>` constructed explicitly per
//! configured `(dimension, equation)` pair at program start, never via
//! global/inventory-style registration.
//!
//! `StepController<S, R, I, L>` is generic over the system, Riemann solver,
//! indicator and limiter so the kernel never pays for dynamic dispatch in
//! its hot loop. Configuration, though, picks all four at runtime from a
//! YAML file, so this module erases the choice of EOS/indicator/Riemann
//! solver behind three small closed enums (`AnyEos`, `AnyIndicator`,
//! `AnyRiemannSolver`) that each implement their capability trait once, by
//! matching through to the concrete variant -- and then erases the
//! remaining `S`/`DIM` choice behind the `ErasedEquation` trait object,
//! with one monomorphization per `(equation kind, dimension)` arm.

use hv_core::{
    HyperbolicSystemView, Indicator, Limiter, PrecomputedArray, Real, RiemannSolver,
    SparseRowView, StateArray, StateVector,
};
use hv_ensemble::EnsembleReducer;
use hv_equations::{
    EquationError, EquationOfState, EulerAeos, NobleAbelStiffenedGasEos, PolytropicEuler,
    PolytropicGasEos, ScalarAdvection, ShallowWater, TabulatedEos, VanDerWaalsEos,
};
use hv_limiter::{
    ConvexLimiter, EntropyViscosityCommutator, FieldSelector, LineSearchConfig, OneIndicator,
    SmoothnessIndicator, ZeroIndicator,
};
use hv_offline::OfflineData;
use hv_riemann::{GuermondPopovSolver, NoopRiemannSolver, RiemannConfig};
use hv_step::{RkStage, StepConfig, StepController, StepOutcome, StepResult};

use crate::config::{
    EosConfig, EquationDispatchConfig, EquationKind, FieldSelectorConfig, HyperbolicModuleConfig,
    IndicatorConfig, RiemannSolverConfig,
};
use crate::error::ConfigError;

/// Closed sum of the EOS families `EulerAeos` can be built over.
pub enum AnyEos {
    Polytropic(PolytropicGasEos),
    NobleAbelStiffenedGas(NobleAbelStiffenedGasEos),
    VanDerWaals(VanDerWaalsEos),
    Tabulated(TabulatedEos),
}

impl EquationOfState for AnyEos {
    fn q(&self) -> Real {
        match self {
            AnyEos::Polytropic(e) => e.q(),
            AnyEos::NobleAbelStiffenedGas(e) => e.q(),
            AnyEos::VanDerWaals(e) => e.q(),
            AnyEos::Tabulated(e) => e.q(),
        }
    }

    fn p_infty(&self) -> Real {
        match self {
            AnyEos::Polytropic(e) => e.p_infty(),
            AnyEos::NobleAbelStiffenedGas(e) => e.p_infty(),
            AnyEos::VanDerWaals(e) => e.p_infty(),
            AnyEos::Tabulated(e) => e.p_infty(),
        }
    }

    fn b(&self) -> Real {
        match self {
            AnyEos::Polytropic(e) => e.b(),
            AnyEos::NobleAbelStiffenedGas(e) => e.b(),
            AnyEos::VanDerWaals(e) => e.b(),
            AnyEos::Tabulated(e) => e.b(),
        }
    }

    fn pressure(&self, rho: Real, e: Real) -> Real {
        match self {
            AnyEos::Polytropic(eos) => eos.pressure(rho, e),
            AnyEos::NobleAbelStiffenedGas(eos) => eos.pressure(rho, e),
            AnyEos::VanDerWaals(eos) => eos.pressure(rho, e),
            AnyEos::Tabulated(eos) => eos.pressure(rho, e),
        }
    }
}

fn build_eos(config: &EosConfig) -> Result<AnyEos, EquationError> {
    Ok(match config.clone() {
        EosConfig::Polytropic { gamma } => AnyEos::Polytropic(PolytropicGasEos { gamma }),
        EosConfig::NobleAbelStiffenedGas {
            gamma,
            covolume_b,
            p_infty,
            q,
        } => AnyEos::NobleAbelStiffenedGas(NobleAbelStiffenedGasEos {
            gamma,
            covolume_b,
            p_infty,
            q,
        }),
        EosConfig::VanDerWaals {
            gamma,
            attraction_a,
            covolume_b,
            gas_constant_r,
        } => AnyEos::VanDerWaals(VanDerWaalsEos {
            gamma,
            attraction_a,
            covolume_b,
            gas_constant_r,
        }),
        EosConfig::Tabulated { points } => {
            if points.len() < 2 {
                return Err(EquationError::Unimplemented {
                    what: "tabulated EOS with fewer than two points",
                });
            }
            AnyEos::Tabulated(TabulatedEos::from_points(points))
        }
    })
}

/// Closed sum of the indicators the `indicator` config option can select.
pub enum AnyIndicator {
    Zero(ZeroIndicator),
    One(OneIndicator),
    Smoothness(SmoothnessIndicator),
    EntropyViscosity(EntropyViscosityCommutator),
}

impl<S: HyperbolicSystemView> Indicator<S> for AnyIndicator {
    fn node_indicator(
        &self,
        system: &S,
        i_state: &StateArray,
        i_precomputed: &PrecomputedArray,
        row: SparseRowView<'_>,
        state_of: &dyn Fn(usize) -> StateArray,
        precomputed_of: &dyn Fn(usize) -> PrecomputedArray,
) -> Real {
        match self {
            AnyIndicator::Zero(i) => {
                i.node_indicator(system, i_state, i_precomputed, row, state_of, precomputed_of)
            }
            AnyIndicator::One(i) => {
                i.node_indicator(system, i_state, i_precomputed, row, state_of, precomputed_of)
            }
            AnyIndicator::Smoothness(i) => {
                i.node_indicator(system, i_state, i_precomputed, row, state_of, precomputed_of)
            }
            AnyIndicator::EntropyViscosity(i) => {
                i.node_indicator(system, i_state, i_precomputed, row, state_of, precomputed_of)
            }
        }
    }
}

fn build_indicator(config: IndicatorConfig) -> AnyIndicator {
    match config {
        IndicatorConfig::Zero => AnyIndicator::Zero(ZeroIndicator),
        IndicatorConfig::One => AnyIndicator::One(OneIndicator),
        IndicatorConfig::Smoothness { field } => AnyIndicator::Smoothness(SmoothnessIndicator {
            field: match field {
                FieldSelectorConfig::Density => FieldSelector::Density,
                FieldSelectorConfig::InternalEnergy => FieldSelector::InternalEnergy,
                FieldSelectorConfig::Pressure => FieldSelector::Pressure,
            },
        }),
        IndicatorConfig::EntropyViscosity => AnyIndicator::EntropyViscosity(EntropyViscosityCommutator),
    }
}

/// Closed sum of the Riemann solvers the `riemann` config option selects.
pub enum AnyRiemannSolver {
    GuermondPopov(GuermondPopovSolver),
    Noop(NoopRiemannSolver),
}

impl<S: HyperbolicSystemView> RiemannSolver<S> for AnyRiemannSolver {
    fn compute(
        &self,
        system: &S,
        u_i: &StateArray,
        precomputed_i: &PrecomputedArray,
        u_j: &StateArray,
        precomputed_j: &PrecomputedArray,
        n_ij: [f64; 3],
) -> hv_core::RiemannResult {
        match self {
            AnyRiemannSolver::GuermondPopov(r) => {
                r.compute(system, u_i, precomputed_i, u_j, precomputed_j, n_ij)
            }
            AnyRiemannSolver::Noop(r) => {
                r.compute(system, u_i, precomputed_i, u_j, precomputed_j, n_ij)
            }
        }
    }
}

fn build_riemann(config: RiemannSolverConfig) -> AnyRiemannSolver {
    match config {
        RiemannSolverConfig::GuermondPopov {
            newton_max_iter,
            newton_eps,
        } => AnyRiemannSolver::GuermondPopov(GuermondPopovSolver::new(RiemannConfig {
            newton_max_iter,
            newton_eps,
        })),
        RiemannSolverConfig::Noop => AnyRiemannSolver::Noop(NoopRiemannSolver),
    }
}

fn build_limiter(config: crate::config::LimiterConfig) -> ConvexLimiter {
    ConvexLimiter {
        line_search: LineSearchConfig {
            line_search_eps: config.line_search_eps,
            line_search_max_iter: config.line_search_max_iter,
        },
        relax_bounds: config.relax_bounds,
    }
}

fn build_step_config(module: &HyperbolicModuleConfig) -> StepConfig {
    StepConfig {
        cfl_number: module.cfl_number,
        id_violation_strategy: module.id_violation_strategy,
        limiter_iterations: module.limiter_iterations,
    }
}

/// One configured equation instance, dyn-dispatched at the call surface
/// `StepController::step` already exposes only through `&dyn`
/// collaborators and owned/borrowed `StateVector`s.
pub trait ErasedEquation: Send + Sync {
    fn num_components(&self) -> usize;

    fn zero_state(&self, len: usize) -> StateVector {
        StateVector::zeros(self.num_components(), len)
    }

    fn step(
        &self,
        offline: &dyn OfflineData,
        ensemble: &dyn EnsembleReducer,
        state: &StateVector,
        tau_requested: Option<Real>,
) -> StepResult<StepOutcome>;

    fn n_restarts(&self) -> u64;
    fn n_warnings(&self) -> u64;
}

struct Instance<S, R, I, L> {
    controller: StepController<S, R, I, L>,
}

impl<S, R, I, L> ErasedEquation for Instance<S, R, I, L>
where
    S: HyperbolicSystemView,
    R: RiemannSolver<S>,
    I: Indicator<S>,
    L: Limiter<S>,
{
    fn num_components(&self) -> usize {
        S::NUM_COMPONENTS
    }

    fn step(
        &self,
        offline: &dyn OfflineData,
        ensemble: &dyn EnsembleReducer,
        state: &StateVector,
        tau_requested: Option<Real>,
) -> StepResult<StepOutcome> {
        // The erasure boundary drops RK-stage contributions: a fully
        // generic `&[RkStage<'_>]` can't cross a `dyn` trait object
        // without naming `S`, so the erased registry always runs the
        // single-stage (no blending) path. Callers that need multi-stage
        // RK go through `StepController` directly, unerased.
        let no_stages: &[RkStage<'_>] = &[];
        self.controller.step(offline, ensemble, state, tau_requested, no_stages)
    }

    fn n_restarts(&self) -> u64 {
        self.controller.n_restarts()
    }

    fn n_warnings(&self) -> u64 {
        self.controller.n_warnings()
    }
}

fn dimension_error(got: usize) -> ConfigError {
    ConfigError::Equation(EquationError::DimensionOutOfRange {
        got,
        accepted: &[1, 2, 3],
    })
}

/// Constructs one `Box<dyn ErasedEquation>` for a configured
/// `(dimension, equation)` pair . Every arm is a distinct
/// monomorphization of `Instance<S, R, I, L>`; there is no global registry
/// to look the pair up in, only this match.
pub fn build_equation(
    dispatch: &EquationDispatchConfig,
    module: &HyperbolicModuleConfig,
) -> Result<Box<dyn ErasedEquation>, ConfigError> {
    tracing::debug!(dimension = dispatch.dimension, "constructing equation instance");
    let indicator = build_indicator(module.indicator);
    let riemann = build_riemann(module.riemann);
    let limiter = build_limiter(module.limiter);
    let step_config = build_step_config(module);

    match (&dispatch.equation, dispatch.dimension) {
        (EquationKind::EulerAeos { eos }, 1) => {
            let system: EulerAeos<AnyEos, 1> = EulerAeos::new(build_eos(eos)?);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::EulerAeos { eos }, 2) => {
            let system: EulerAeos<AnyEos, 2> = EulerAeos::new(build_eos(eos)?);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::EulerAeos { eos }, 3) => {
            let system: EulerAeos<AnyEos, 3> = EulerAeos::new(build_eos(eos)?);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::PolytropicEuler { gamma }, 1) => {
            let system: PolytropicEuler<1> = PolytropicEuler::new(*gamma);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::PolytropicEuler { gamma }, 2) => {
            let system: PolytropicEuler<2> = PolytropicEuler::new(*gamma);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::PolytropicEuler { gamma }, 3) => {
            let system: PolytropicEuler<3> = PolytropicEuler::new(*gamma);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::ShallowWater { gravity }, 1) => {
            let system: ShallowWater<1> = ShallowWater::new(*gravity);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::ShallowWater { gravity }, 2) => {
            let system: ShallowWater<2> = ShallowWater::new(*gravity);
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::Skeleton { beta }, _) => {
            let system = ScalarAdvection { beta: *beta };
            Ok(Box::new(Instance {
                controller: StepController::new(system, riemann, indicator, limiter, step_config),
            }))
        }
        (EquationKind::ShallowWater { .. }, d) => Err(ConfigError::Equation(
            EquationError::DimensionOutOfRange { got: d, accepted: &[1, 2] },
)),
        (_, d) => Err(dimension_error(d)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_ensemble::SingleRankReducer;
    use hv_offline::Line1DBuilder;

    #[test]
    fn builds_euler_aeos_sod_and_runs_one_step() {
        let dispatch = EquationDispatchConfig {
            dimension: 1,
            equation: EquationKind::EulerAeos {
                eos: EosConfig::Polytropic { gamma: 1.4 },
            },
        };
        let module = HyperbolicModuleConfig {
            indicator: IndicatorConfig::Zero,
            riemann: RiemannSolverConfig::default(),
            limiter: crate::config::LimiterConfig::default(),
            cfl_number: 0.5,
            id_violation_strategy: hv_step::IdViolationStrategy::Warn,
            limiter_iterations: 2,
        };
        let equation = build_equation(&dispatch, &module).unwrap();
        assert_eq!(equation.num_components(), 3);

        let offline = Line1DBuilder::new(11, 1.0).build().unwrap();
        let mut state = equation.zero_state(11);
        for i in 0..11 {
            let rho = if i < 5 { 1.0 } else { 0.125 };
            let p = if i < 5 { 1.0 } else { 0.1 };
            let e = p / ((1.4 - 1.0) * rho);
            let u = [rho, 0.0, rho * e, 0.0, 0.0];
            state.set(hv_core::NodeIndex::from_index(i), &u);
        }
        let reducer = SingleRankReducer;
        let outcome = equation.step(&offline, &reducer, &state, None).unwrap();
        assert!(matches!(outcome, StepOutcome::Accepted { .. }));
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        let dispatch = EquationDispatchConfig {
            dimension: 7,
            equation: EquationKind::PolytropicEuler { gamma: 1.4 },
        };
        let module = HyperbolicModuleConfig {
            indicator: IndicatorConfig::Zero,
            riemann: RiemannSolverConfig::default(),
            limiter: crate::config::LimiterConfig::default(),
            cfl_number: 1.0,
            id_violation_strategy: hv_step::IdViolationStrategy::Warn,
            limiter_iterations: 1,
        };
        assert!(build_equation(&dispatch, &module).is_err());
    }
}
