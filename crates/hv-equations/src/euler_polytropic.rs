//! Polytropic Euler: the fixed-`gamma` specialization of [`EulerAeos`].

use crate::eos::PolytropicGasEos;
use crate::euler_aeos::EulerAeos;
use hv_core::{BoundaryData, BoundaryId, HyperbolicSystemView, PrecomputedArray, Real, RiemannPrimitive1D, StateArray};

/// Fixed-`gamma` Euler. Delegates to [`EulerAeos<PolytropicGasEos, DIM>`] for
/// flux/primitive conversion/admissibility, but skips the one-ring
/// `gamma_min` fold: gamma is the same compile-time-fixed value at every
/// node, so folding it across the mesh would just recompute the constant
/// the caller already passed to `new`. `precompute_cycle0` does the whole
/// precomputed tuple in one pass and `NUM_PRECOMPUTE_CYCLES` is 1.
pub struct PolytropicEuler<const DIM: usize> {
    inner: EulerAeos<PolytropicGasEos, DIM>,
}

impl<const DIM: usize> PolytropicEuler<DIM> {
    pub fn new(gamma: Real) -> Self {
        Self {
            inner: EulerAeos::new(PolytropicGasEos { gamma }),
        }
    }

    pub fn gamma(&self) -> Real {
        self.inner.eos.gamma
    }
}

impl<const DIM: usize> HyperbolicSystemView for PolytropicEuler<DIM> {
    const NUM_COMPONENTS: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_COMPONENTS;
    const NUM_PRECOMPUTED: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_PRECOMPUTED;
    const NUM_PRECOMPUTE_CYCLES: usize = 1;

    fn flux(&self, u: &StateArray, precomputed: &PrecomputedArray, n: [f64; 3], out: &mut StateArray) {
        self.inner.flux(u, precomputed, n, out)
    }

    fn to_primitive(&self, u: &StateArray) -> StateArray {
        self.inner.to_primitive(u)
    }

    fn from_primitive(&self, v: &StateArray) -> StateArray {
        self.inner.from_primitive(v)
    }

    fn is_admissible(&self, u: &StateArray, precomputed: &PrecomputedArray) -> bool {
        self.inner.is_admissible(u, precomputed)
    }

    fn precompute_cycle0(&self, u: &StateArray) -> PrecomputedArray {
        self.inner.precompute_fixed_gamma(u)
    }

    fn riemann_primitive_1d(&self, u: &StateArray, precomputed: &PrecomputedArray, n: [f64; 3]) -> RiemannPrimitive1D {
        self.inner.riemann_primitive_1d(u, precomputed, n)
    }

    fn apply_boundary(&self, id: BoundaryId, u: &StateArray, data: &BoundaryData) -> StateArray {
        self.inner.apply_boundary(id, u, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sod_initial_left_state_is_admissible() {
        let system: PolytropicEuler<1> = PolytropicEuler::new(1.4);
        let v = [1.0, 0.0, 2.5, 0.0, 0.0];
        let u = system.to_primitive(&system.from_primitive(&v));
        assert!((u[0] - v[0]).abs() < 1e-12);
    }
}
