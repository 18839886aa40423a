//! Free boundary-condition functions shared by the Euler and shallow-water
//! views. Each `HyperbolicSystemView::apply_boundary` impl
//! delegates here instead of repeating the reflection/projection algebra.

use hv_core::{safe_division, BoundaryData, BoundaryId, Real, StateArray};

use crate::euler_aeos::EulerAeos;
use crate::eos::EquationOfState;
use crate::shallow_water::ShallowWater;

/// Project out the normal component of a momentum-like vector slice
/// `u[first..first+dim]`, i.e. `m' = m - (m . n) n` (slip/free-slip wall).
fn reflect_normal_component(u: &mut StateArray, first: usize, dim: usize, normal: [f64; 3]) {
    let mut m = [0.0; 3];
    for d in 0..dim {
        m[d] = u[first + d];
    }
    let m_n = m[0] * normal[0] + m[1] * normal[1] + m[2] * normal[2];
    for d in 0..dim {
        u[first + d] -= m_n * normal[d];
    }
}

fn zero_momentum(u: &mut StateArray, first: usize, dim: usize) {
    for d in 0..dim {
        u[first + d] = 0.0;
    }
}

pub fn apply_euler_boundary<E: EquationOfState, const DIM: usize>(
    system: &EulerAeos<E, DIM>,
    id: BoundaryId,
    u: &StateArray,
    data: &BoundaryData,
) -> StateArray {
    let mut out = *u;
    match id {
        BoundaryId::Dirichlet => out = data.prescribed,
        BoundaryId::DirichletMomentum => {
            for d in 0..DIM {
                out[1 + d] = data.prescribed[1 + d];
            }
        }
        BoundaryId::Slip => reflect_normal_component(&mut out, 1, DIM, data.normal),
        BoundaryId::NoSlip => zero_momentum(&mut out, 1, DIM),
        BoundaryId::Dynamic => apply_dynamic_euler(system, &mut out, data),
    }
    out
}

pub fn apply_shallow_water_boundary<const DIM: usize>(
    system: &ShallowWater<DIM>,
    id: BoundaryId,
    u: &StateArray,
    data: &BoundaryData,
) -> StateArray {
    let mut out = *u;
    match id {
        BoundaryId::Dirichlet => out = data.prescribed,
        BoundaryId::DirichletMomentum => {
            for d in 0..DIM {
                out[1 + d] = data.prescribed[1 + d];
            }
        }
        BoundaryId::Slip => reflect_normal_component(&mut out, 1, DIM, data.normal),
        BoundaryId::NoSlip => zero_momentum(&mut out, 1, DIM),
        BoundaryId::Dynamic => apply_dynamic_shallow_water(system, &mut out, data),
    }
    out
}

/// Which of the four characteristic regimes the normal velocity/sound-speed
/// pair falls into, plus the reconstructed boundary normal velocity for the
/// two subsonic regimes.
enum DynamicRegime {
    SupersonicInflow,
    SubsonicInflow { v_n: Real },
    SubsonicOutflow { v_n: Real },
    SupersonicOutflow,
}

/// Combines the outgoing interior Riemann invariant `R_1 = v_n + 2a/(gamma-1)`
/// with the incoming exterior invariant `R_2 = v_n - 2a/(gamma-1)` into a
/// reconstructed boundary normal velocity `(R_1+R_2)/2`. Only
/// called in the two subsonic regimes, where both invariants are physically
/// meaningful; `R_2 < R_1` is a consequence of the subsonic ordering and is
/// asserted rather than silently tolerated.
fn reconstruct_subsonic_v_n(v_n_i: Real, a_i: Real, v_n_e: Real, a_e: Real, gamma: Real) -> Real {
    let r1 = v_n_i + 2.0 * a_i / (gamma - 1.0);
    let r2 = v_n_e - 2.0 * a_e / (gamma - 1.0);
    debug_assert!(r2 < r1, "dynamic boundary: R_2 ({r2}) must be < R_1 ({r1})");
    0.5 * (r1 + r2)
}

/// Classifies the boundary by comparing the interior normal velocity `v_n`
/// against `+-a_i`, then (for the two subsonic regimes) reconstructs the
/// boundary normal velocity from the interior/exterior Riemann invariants.
fn dynamic_regime(v_n_i: Real, a_i: Real, v_n_e: Real, a_e: Real, gamma: Real) -> DynamicRegime {
    if v_n_i <= -a_i {
        DynamicRegime::SupersonicInflow
    } else if v_n_i >= a_i {
        DynamicRegime::SupersonicOutflow
    } else {
        let v_n = reconstruct_subsonic_v_n(v_n_i, a_i, v_n_e, a_e, gamma);
        if v_n < 0.0 {
            DynamicRegime::SubsonicInflow { v_n }
        } else {
            DynamicRegime::SubsonicOutflow { v_n }
        }
    }
}

/// Overwrites only the normal-velocity component of `u`'s momentum, holding
/// the tangential momentum fixed, and (if `energy_idx` is `Some`) carries
/// the kinetic-energy change from the normal-velocity change into the total
/// energy so the reconstructed state stays self-consistent.
fn set_normal_velocity(
    u: &mut StateArray,
    n: [f64; 3],
    dim: usize,
    v_n_new: Real,
    energy_idx: Option<usize>,
) {
    let rho = u[0];
    let mut m = [0.0; 3];
    for d in 0..dim {
        m[d] = u[1 + d];
    }
    let v_n_old = safe_division(m[0] * n[0] + m[1] * n[1] + m[2] * n[2], rho);
    let delta = v_n_new - v_n_old;
    for d in 0..dim {
        u[1 + d] += rho * delta * n[d];
    }
    if let Some(idx) = energy_idx {
        u[idx] += 0.5 * rho * (v_n_new * v_n_new - v_n_old * v_n_old);
    }
}

/// Dynamic (characteristic far-field) condition for the Euler system:
/// decomposes into the four regimes obtained by comparing
/// the interior normal velocity against `+-a` (supersonic/subsonic,
/// in/outflow). Supersonic regimes prescribe or float the whole state;
/// the two subsonic regimes reconstruct only the normal velocity from the
/// combined interior/exterior Riemann invariants, holding everything else
/// (tangential velocity, density, entropy) at the interior value for
/// outflow or the prescribed value for inflow, and carry the resulting
/// kinetic-energy change into the total energy.
fn apply_dynamic_euler<E: EquationOfState, const DIM: usize>(
    system: &EulerAeos<E, DIM>,
    u: &mut StateArray,
    data: &BoundaryData,
) {
    let n = data.normal;
    let (v_n_i, a_i, gamma) = system.dynamic_boundary_inputs(u, n);
    let (v_n_e, a_e, _) = system.dynamic_boundary_inputs(&data.prescribed, n);
    let energy_idx = Some(1 + DIM);

    match dynamic_regime(v_n_i, a_i, v_n_e, a_e, gamma) {
        DynamicRegime::SupersonicInflow => *u = data.prescribed,
        DynamicRegime::SupersonicOutflow => {}
        DynamicRegime::SubsonicInflow { v_n } => {
            *u = data.prescribed;
            set_normal_velocity(u, n, DIM, v_n, energy_idx);
        }
        DynamicRegime::SubsonicOutflow { v_n } => {
            set_normal_velocity(u, n, DIM, v_n, energy_idx);
        }
    }
}

/// Dynamic condition for shallow water: same four-regime decomposition,
/// with the barotropic wave speed `a = sqrt(g h)` standing in for the
/// Euler sound speed and `gamma = 2` (the shallow-water pressure law is the
/// gamma=2 polytrope, matching `riemann_primitive_1d`'s `gamma_min`). No
/// energy component to correct.
fn apply_dynamic_shallow_water<const DIM: usize>(
    system: &ShallowWater<DIM>,
    u: &mut StateArray,
    data: &BoundaryData,
) {
    let n = data.normal;
    let (v_n_i, a_i, gamma) = system.dynamic_boundary_inputs(u, n);
    let (v_n_e, a_e, _) = system.dynamic_boundary_inputs(&data.prescribed, n);

    match dynamic_regime(v_n_i, a_i, v_n_e, a_e, gamma) {
        DynamicRegime::SupersonicInflow => *u = data.prescribed,
        DynamicRegime::SupersonicOutflow => {}
        DynamicRegime::SubsonicInflow { v_n } => {
            *u = data.prescribed;
            set_normal_velocity(u, n, DIM, v_n, None);
        }
        DynamicRegime::SubsonicOutflow { v_n } => {
            set_normal_velocity(u, n, DIM, v_n, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::PolytropicGasEos;

    #[test]
    fn slip_zeroes_normal_momentum() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = [1.0, 2.0, 0.0, 0.0, 0.0];
        let data = BoundaryData {
            id: BoundaryId::Slip,
            normal: [1.0, 0.0, 0.0],
            normal_mass: 1.0,
            boundary_mass: 1.0,
            position: [0.0, 0.0, 0.0],
            prescribed: [0.0; 5],
        };
        let out = apply_euler_boundary(&system, BoundaryId::Slip, &u, &data);
        assert!(out[1].abs() < 1e-12);
    }

    #[test]
    fn no_slip_zeroes_all_momentum() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = [1.0, 2.0, 0.0, 0.0, 0.0];
        let data = BoundaryData {
            id: BoundaryId::NoSlip,
            normal: [1.0, 0.0, 0.0],
            normal_mass: 1.0,
            boundary_mass: 1.0,
            position: [0.0, 0.0, 0.0],
            prescribed: [0.0; 5],
        };
        let out = apply_euler_boundary(&system, BoundaryId::NoSlip, &u, &data);
        assert_eq!(out[1], 0.0);
    }

    /// Builds a 1-D conserved state from `(rho, v, p)` with `gamma = 1.4`,
    /// matching `euler_aeos::tests::sample_state`'s construction.
    fn state_from_rho_v_p(rho: Real, v: Real, p: Real) -> StateArray {
        let gamma = 1.4;
        let e = p / ((gamma - 1.0) * rho);
        [rho, rho * v, rho * e + 0.5 * rho * v * v, 0.0, 0.0]
    }

    #[test]
    fn supersonic_outflow_floats_the_interior_state() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = state_from_rho_v_p(1.0, 10.0, 2.5);
        let data = BoundaryData {
            id: BoundaryId::Dynamic,
            normal: [1.0, 0.0, 0.0],
            normal_mass: 1.0,
            boundary_mass: 1.0,
            position: [0.0, 0.0, 0.0],
            prescribed: state_from_rho_v_p(0.125, 0.0, 0.25),
        };
        let out = apply_euler_boundary(&system, BoundaryId::Dynamic, &u, &data);
        for c in 0..3 {
            assert!((out[c] - u[c]).abs() < 1e-12);
        }
    }

    #[test]
    fn supersonic_inflow_prescribes_the_exterior_state() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = state_from_rho_v_p(1.0, -10.0, 2.5);
        let prescribed = state_from_rho_v_p(0.125, -0.2, 0.25);
        let data = BoundaryData {
            id: BoundaryId::Dynamic,
            normal: [1.0, 0.0, 0.0],
            normal_mass: 1.0,
            boundary_mass: 1.0,
            position: [0.0, 0.0, 0.0],
            prescribed,
        };
        let out = apply_euler_boundary(&system, BoundaryId::Dynamic, &u, &data);
        for c in 0..3 {
            assert!((out[c] - prescribed[c]).abs() < 1e-12);
        }
    }

    #[test]
    fn subsonic_dynamic_boundary_keeps_density_positive() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = state_from_rho_v_p(1.0, 0.2, 2.5);
        let prescribed = state_from_rho_v_p(0.125, 0.1, 0.25);
        let data = BoundaryData {
            id: BoundaryId::Dynamic,
            normal: [1.0, 0.0, 0.0],
            normal_mass: 1.0,
            boundary_mass: 1.0,
            position: [0.0, 0.0, 0.0],
            prescribed,
        };
        let out = apply_euler_boundary(&system, BoundaryId::Dynamic, &u, &data);
        assert!(out[0] > 0.0);
    }
}
