//! Minimal scalar-advection system used for regression tests against the
//! kernel and limiter in isolation from any real physics.

use hv_core::{
    BoundaryData, BoundaryId, HyperbolicSystemView, PrecomputedArray, Real, RiemannPrimitive1D,
    StateArray,
};

/// Linear scalar advection `u_t + beta . grad u = 0`. One component, no
/// precompute cycle, trivial Riemann data (upwind flux handled entirely by
/// the Riemann solver's own wave-speed estimate).
pub struct ScalarAdvection {
    pub beta: [Real; 3],
}

impl HyperbolicSystemView for ScalarAdvection {
    const NUM_COMPONENTS: usize = 1;
    const NUM_PRECOMPUTED: usize = 1;
    const NUM_PRECOMPUTE_CYCLES: usize = 1;

    fn flux(&self, u: &StateArray, _precomputed: &PrecomputedArray, n: [f64; 3], out: &mut StateArray) {
        let beta_n = self.beta[0] * n[0] + self.beta[1] * n[1] + self.beta[2] * n[2];
        out[0] = u[0] * beta_n;
        for c in 1..hv_core::MAX_COMPONENTS {
            out[c] = 0.0;
        }
    }

    fn to_primitive(&self, u: &StateArray) -> StateArray {
        *u
    }

    fn from_primitive(&self, v: &StateArray) -> StateArray {
        *v
    }

    fn is_admissible(&self, u: &StateArray, _precomputed: &PrecomputedArray) -> bool {
        u[0].is_finite()
    }

    fn precompute_cycle0(&self, _u: &StateArray) -> PrecomputedArray {
        [0.0; hv_core::MAX_PRECOMPUTED]
    }

    fn riemann_primitive_1d(
        &self,
        u: &StateArray,
        _precomputed: &PrecomputedArray,
        n: [f64; 3],
) -> RiemannPrimitive1D {
        let beta_n = self.beta[0] * n[0] + self.beta[1] * n[1] + self.beta[2] * n[2];
        RiemannPrimitive1D {
            rho: u[0],
            v_n: beta_n,
            p: 0.0,
            a: beta_n.abs(),
            gamma_min: 1.0,
        }
    }

    fn apply_boundary(&self, id: BoundaryId, u: &StateArray, data: &BoundaryData) -> StateArray {
        match id {
            BoundaryId::Dirichlet => {
                let mut out = [0.0; hv_core::MAX_COMPONENTS];
                out[0] = data.prescribed[0];
                out
            }
            _ => *u,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_is_linear_in_state() {
        let system = ScalarAdvection { beta: [1.0, 0.0, 0.0] };
        let mut out = [0.0; hv_core::MAX_COMPONENTS];
        let u = [2.0, 0.0, 0.0, 0.0, 0.0];
        let pre = [0.0; hv_core::MAX_PRECOMPUTED];
        system.flux(&u, &pre, [1.0, 0.0, 0.0], &mut out);
        assert!((out[0] - 2.0).abs() < 1e-12);
    }
}
