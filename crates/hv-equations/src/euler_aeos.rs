//! Euler equations with an arbitrary equation of state.
//! `PolytropicEuler` is the specialization with `gamma` fixed and no
//! one-ring `gamma_min` gather.

use crate::eos::{
    harten_entropy_surrogate, specific_entropy_surrogate, surrogate_gamma, surrogate_pressure,
    surrogate_sound_speed, EquationOfState,
};
use hv_core::{
    safe_division, BoundaryData, BoundaryId, HyperbolicSystemView, PrecomputedArray, Real,
    RiemannPrimitive1D, StateArray,
};

const IDX_RHO: usize = 0;
const IDX_P: usize = 0;
const IDX_GAMMA_MIN: usize = 1;
const IDX_S: usize = 2;
const IDX_ETA: usize = 3;

/// Euler equations with `DIM` momentum components and an arbitrary
/// equation of state. Conserved layout is `[rho, m_1..m_DIM, E]`.
pub struct EulerAeos<E: EquationOfState, const DIM: usize> {
    pub eos: E,
}

impl<E: EquationOfState, const DIM: usize> EulerAeos<E, DIM> {
    pub fn new(eos: E) -> Self {
        assert!((1..=3).contains(&DIM), "dimension must be 1, 2 or 3");
        Self { eos }
    }

    fn energy_index(&self) -> usize {
        1 + DIM
    }

    fn momentum(&self, u: &StateArray) -> [Real; 3] {
        let mut m = [0.0; 3];
        for d in 0..DIM {
            m[d] = u[1 + d];
        }
        m
    }

    fn momentum_sq(&self, u: &StateArray) -> Real {
        let m = self.momentum(u);
        m[0] * m[0] + m[1] * m[1] + m[2] * m[2]
    }

    /// `rho * e = E - 0.5 |m|^2 / rho`.
    fn rhoe(&self, u: &StateArray) -> Real {
        let rho = u[IDX_RHO];
        let e_total = u[self.energy_index()];
        e_total - 0.5 * safe_division(self.momentum_sq(u), rho)
    }

    fn specific_internal_energy(&self, u: &StateArray) -> Real {
        safe_division(self.rhoe(u), u[IDX_RHO])
    }
}

impl<E: EquationOfState, const DIM: usize> HyperbolicSystemView for EulerAeos<E, DIM> {
    const NUM_COMPONENTS: usize = 2 + DIM;
    const NUM_PRECOMPUTED: usize = 4;
    const NUM_PRECOMPUTE_CYCLES: usize = 2;

    fn flux(&self, u: &StateArray, precomputed: &PrecomputedArray, n: [f64; 3], out: &mut StateArray) {
        let rho = u[IDX_RHO];
        let m = self.momentum(u);
        let v_n = safe_division(m[0] * n[0] + m[1] * n[1] + m[2] * n[2], rho);
        let p = precomputed[IDX_P];
        let e_total = u[self.energy_index()];

        out[IDX_RHO] = rho * v_n;
        for d in 0..DIM {
            out[1 + d] = m[d] * v_n + p * n[d];
        }
        out[self.energy_index()] = (e_total + p) * v_n;
        for c in Self::NUM_COMPONENTS..hv_core::MAX_COMPONENTS {
            out[c] = 0.0;
        }
    }

    fn to_primitive(&self, u: &StateArray) -> StateArray {
        let rho = u[IDX_RHO];
        let mut v = [0.0; hv_core::MAX_COMPONENTS];
        v[IDX_RHO] = rho;
        for d in 0..DIM {
            v[1 + d] = safe_division(u[1 + d], rho);
        }
        v[self.energy_index()] = self.specific_internal_energy(u);
        v
    }

    fn from_primitive(&self, v: &StateArray) -> StateArray {
        let rho = v[IDX_RHO];
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        u[IDX_RHO] = rho;
        let mut speed_sq = 0.0;
        for d in 0..DIM {
            u[1 + d] = rho * v[1 + d];
            speed_sq += v[1 + d] * v[1 + d];
        }
        let e_specific = v[self.energy_index()];
        u[self.energy_index()] = rho * e_specific + 0.5 * rho * speed_sq;
        u
    }

    fn is_admissible(&self, u: &StateArray, precomputed: &PrecomputedArray) -> bool {
        let rho = u[IDX_RHO];
        if !(rho > 0.0) {
            return false;
        }
        let rhoe = self.rhoe(u);
        let covolume = 1.0 - self.eos.b() * rho;
        let shift = rho * self.eos.q() + self.eos.p_infty() * covolume;
        let _ = precomputed;
        rhoe >= shift
    }

    fn precompute_cycle0(&self, u: &StateArray) -> PrecomputedArray {
        let rho = u[IDX_RHO];
        let e = self.specific_internal_energy(u);
        let p = self.eos.pressure(rho, e);
        let gamma = surrogate_gamma(rho, e, p, self.eos.q(), self.eos.p_infty(), self.eos.b());
        let mut out = [0.0; hv_core::MAX_PRECOMPUTED];
        out[IDX_P] = p;
        out[IDX_GAMMA_MIN] = gamma; // temporarily holds this node's own gamma
        out
    }

    fn precompute_fold_seed(&self, cycle0: &PrecomputedArray) -> Real {
        cycle0[IDX_GAMMA_MIN]
    }

    fn precompute_cycle1(
        &self,
        u: &StateArray,
        cycle0: &PrecomputedArray,
        folded: Real,
) -> PrecomputedArray {
        let rho = u[IDX_RHO];
        let e = self.specific_internal_energy(u);
        let e_shifted = e - self.eos.q();
        let gamma_min = folded;
        let s = specific_entropy_surrogate(rho, e_shifted, gamma_min, self.eos.p_infty(), self.eos.b());
        let eta = harten_entropy_surrogate(rho, e_shifted, gamma_min, self.eos.p_infty(), self.eos.b());
        let mut out = [0.0; hv_core::MAX_PRECOMPUTED];
        out[IDX_P] = cycle0[IDX_P];
        out[IDX_GAMMA_MIN] = gamma_min;
        out[IDX_S] = s;
        out[IDX_ETA] = eta;
        out
    }

    fn riemann_primitive_1d(
        &self,
        u: &StateArray,
        precomputed: &PrecomputedArray,
        n: [f64; 3],
) -> RiemannPrimitive1D {
        let rho = u[IDX_RHO];
        let m = self.momentum(u);
        let v_n = safe_division(m[0] * n[0] + m[1] * n[1] + m[2] * n[2], rho);
        let p = precomputed[IDX_P];
        let e_shifted = self.specific_internal_energy(u) - self.eos.q();
        let gamma = surrogate_gamma(rho, self.specific_internal_energy(u), p, self.eos.q(), self.eos.p_infty(), self.eos.b());
        let a = surrogate_sound_speed(rho, e_shifted, gamma, self.eos.p_infty(), self.eos.b());
        RiemannPrimitive1D {
            rho,
            v_n,
            p,
            a,
            gamma_min: precomputed[IDX_GAMMA_MIN],
        }
    }

    fn apply_boundary(&self, id: BoundaryId, u: &StateArray, data: &BoundaryData) -> StateArray {
        crate::boundary::apply_euler_boundary(self, id, u, data)
    }

    fn density(&self, u: &StateArray) -> Real {
        u[IDX_RHO]
    }

    fn internal_energy_density(&self, u: &StateArray) -> Real {
        self.rhoe(u)
    }

    /// Computed with this node's own surrogate gamma rather than the
    /// one-ring-folded `gamma_min` (not available from `u` alone) —
    /// close enough to gate the limiter's entropy-inequality bound, which
    /// only needs entropy to be monotone in the neighborhood of the bound,
    /// not exact agreement with the folded value used to build `s_min`.
    fn specific_entropy(&self, u: &StateArray) -> Real {
        let rho = u[IDX_RHO];
        let e = self.specific_internal_energy(u);
        let p = self.eos.pressure(rho, e);
        let gamma = surrogate_gamma(rho, e, p, self.eos.q(), self.eos.p_infty(), self.eos.b());
        let e_shifted = e - self.eos.q();
        specific_entropy_surrogate(rho, e_shifted, gamma, self.eos.p_infty(), self.eos.b())
    }
}

impl<E: EquationOfState, const DIM: usize> EulerAeos<E, DIM> {
    /// Surrogate pressure exactly inverting `surrogate_gamma` (used by the
    /// round-trip property test below).
    pub fn surrogate_pressure_of(&self, u: &StateArray, gamma: Real) -> Real {
        let rho = u[IDX_RHO];
        let e = self.specific_internal_energy(u);
        surrogate_pressure(rho, e, gamma, self.eos.q(), self.eos.p_infty(), self.eos.b())
    }

    pub fn pressure(&self, u: &StateArray) -> Real {
        let rho = u[IDX_RHO];
        let e = self.specific_internal_energy(u);
        self.eos.pressure(rho, e)
    }

    /// Full four-slot precomputed tuple for `u` in one pass, with no
    /// one-ring fold: `gamma` is taken from `u` itself rather than the
    /// neighborhood minimum. Correct only when every node in the mesh
    /// shares the same gamma, which is what lets `PolytropicEuler` skip
    /// the fold sweep entirely and run a single precompute cycle.
    pub(crate) fn precompute_fixed_gamma(&self, u: &StateArray) -> PrecomputedArray {
        let cycle0 = self.precompute_cycle0(u);
        let gamma = cycle0[IDX_GAMMA_MIN];
        self.precompute_cycle1(u, &cycle0, gamma)
    }

    /// `(v_n, a, gamma)` at `u`, computed directly from the EOS rather than
    /// a precomputed tuple -- used by the `Dynamic` boundary, which only
    /// receives the raw state, not the node's precomputed slot.
    pub(crate) fn dynamic_boundary_inputs(&self, u: &StateArray, n: [f64; 3]) -> (Real, Real, Real) {
        let rho = u[IDX_RHO];
        let m = self.momentum(u);
        let v_n = safe_division(m[0] * n[0] + m[1] * n[1] + m[2] * n[2], rho);
        let e = self.specific_internal_energy(u);
        let p = self.eos.pressure(rho, e);
        let gamma = surrogate_gamma(rho, e, p, self.eos.q(), self.eos.p_infty(), self.eos.b());
        let e_shifted = e - self.eos.q();
        let a = surrogate_sound_speed(rho, e_shifted, gamma, self.eos.p_infty(), self.eos.b());
        (v_n, a, gamma)
    }

    pub fn sound_speed(&self, u: &StateArray, precomputed: &PrecomputedArray) -> Real {
        let rho = u[IDX_RHO];
        let e_shifted = self.specific_internal_energy(u) - self.eos.q();
        let gamma = surrogate_gamma(
            rho,
            self.specific_internal_energy(u),
            precomputed[IDX_P],
            self.eos.q(),
            self.eos.p_infty(),
            self.eos.b(),
);
        surrogate_sound_speed(rho, e_shifted, gamma, self.eos.p_infty(), self.eos.b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::PolytropicGasEos;

    fn sample_state() -> StateArray {
        let rho = 1.0;
        let v = 0.5;
        let p = 1.0;
        let gamma = 1.4;
        let e = safe_division(p, (gamma - 1.0) * rho);
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        u[0] = rho;
        u[1] = rho * v;
        u[2] = rho * e + 0.5 * rho * v * v;
        u
    }

    #[test]
    fn primitive_round_trip() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = sample_state();
        let v = system.to_primitive(&u);
        let u2 = system.from_primitive(&v);
        for c in 0..EulerAeos::<PolytropicGasEos, 1>::NUM_COMPONENTS {
            assert!((u[c] - u2[c]).abs() < 1e-10, "component {c} mismatch");
        }
    }

    #[test]
    fn admissible_state_is_admissible() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = sample_state();
        let pre = system.precompute_cycle0(&u);
        assert!(system.is_admissible(&u, &pre));
    }

    #[test]
    fn vacuum_state_is_not_admissible() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        u[0] = 0.0;
        u[1] = 0.0;
        u[2] = 0.0;
        let pre = system.precompute_cycle0(&u);
        assert!(!system.is_admissible(&u, &pre));
    }
}
