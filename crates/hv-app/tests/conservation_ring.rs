//! Conservation invariant on a periodic ring : with no boundary
//! flux, the sum of the lumped-mass-weighted state must be preserved by an
//! accepted step to within floating-point tolerance. Mirrors the
//! `tf-sim` integration tests' pattern of asserting a physical invariant
//! across a full run rather than checking intermediate internals.

use hv_app::{EquationDispatchConfig, EquationKind, HyperbolicModuleConfig, IndicatorConfig};
use hv_core::{NodeIndex, StateVector};
use hv_ensemble::SingleRankReducer;
use hv_offline::Ring1DBuilder;
use hv_step::{IdViolationStrategy, StepOutcome};

fn total_mass(offline: &hv_offline::InMemoryOfflineData, state: &StateVector) -> f64 {
    let mass = offline.lumped_mass();
    let mut total = 0.0;
    for i in 0..state.len() {
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        state.get(NodeIndex::from_index(i), &mut u);
        total += mass[i] * u[0];
    }
    total
}

#[test]
fn scalar_advection_conserves_mass_on_a_ring() {
    let dispatch = EquationDispatchConfig {
        dimension: 1,
        equation: EquationKind::Skeleton {
            beta: [1.0, 0.0, 0.0],
        },
    };
    let module = HyperbolicModuleConfig {
        indicator: IndicatorConfig::Zero,
        riemann: hv_app::RiemannSolverConfig::default(),
        limiter: hv_app::LimiterConfig::default(),
        cfl_number: 0.4,
        id_violation_strategy: IdViolationStrategy::Warn,
        limiter_iterations: 2,
    };
    let equation = hv_app::build_equation(&dispatch, &module).unwrap();

    let n = 40;
    let mesh = Ring1DBuilder::new(n, 1.0);
    let offline = mesh.build().unwrap();

    let mut state = equation.zero_state(n);
    for i in 0..n {
        let bump = if (15..25).contains(&i) { 2.0 } else { 1.0 };
        state.set(NodeIndex::from_index(i), &[bump, 0.0, 0.0, 0.0, 0.0]);
    }

    let mass_before = total_mass(&offline, &state);
    let reducer = SingleRankReducer;

    for _ in 0..25 {
        state = match equation.step(&offline, &reducer, &state, None).unwrap() {
            StepOutcome::Accepted { state, .. } => state,
            StepOutcome::Restart(reason) => panic!("unexpected restart: {reason:?}"),
        };
    }

    let mass_after = total_mass(&offline, &state);
    assert!(
        (mass_after - mass_before).abs() < 1e-9 * mass_before.abs().max(1.0),
        "mass drifted from {mass_before} to {mass_after}"
);
    assert_eq!(equation.n_restarts(), 0);
}
