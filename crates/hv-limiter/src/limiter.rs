//! Convex limiter : per-node admissible bounds gathered from
//! the low-order one-ring, and the largest per-edge `l_ij in [0, 1]` the
//! high-order correction may use without leaving them. Bounds are applied
//! in sequence — density box, then internal-energy positivity, then the
//! entropy inequality — each search narrowing the bracket the next stage
//! starts from, the successive-limiting pattern graph-viscosity convex
//! limiters use.

use hv_core::{safe_division, HyperbolicSystemView, Limiter, LimiterBounds, Real, SparseRowView, StateArray};

use crate::root::{largest_feasible_l, LineSearchConfig};

pub struct ConvexLimiter {
    pub line_search: LineSearchConfig,
    /// Multiplicative slack on the one-ring bounds around node `i`'s own
    /// low-order value: `0.0` is the
    /// tight one-ring box; larger values widen `[rho_min, rho_max]` and
    /// lower `rhoe_min`/`s_min` proportionally to tolerate local
    /// oscillation an exactly-tight bound would reject. Scaling this by a
    /// local mesh length scale (a configurable `relaxation order`) would
    /// need a length input `node_bounds` does not receive, so it is left
    /// as a flat per-run constant.
    pub relax_bounds: Real,
}

impl Default for ConvexLimiter {
    fn default() -> Self {
        Self {
            line_search: LineSearchConfig::default(),
            relax_bounds: 0.0,
        }
    }
}

fn state_at(u_low: &StateArray, p_ij: &StateArray, l: Real) -> StateArray {
    let mut out = [0.0; hv_core::MAX_COMPONENTS];
    for c in 0..hv_core::MAX_COMPONENTS {
        out[c] = u_low[c] + l * p_ij[c];
    }
    out
}

impl<S: HyperbolicSystemView> Limiter<S> for ConvexLimiter {
    fn node_bounds(
        &self,
        system: &S,
        i_low_order: &StateArray,
        row: SparseRowView<'_>,
        low_order_of: &dyn Fn(usize) -> StateArray,
) -> LimiterBounds {
        let rho_i = system.density(i_low_order);
        let mut rho_min = rho_i;
        let mut rho_max = rho_i;
        let mut rhoe_min = system.internal_energy_density(i_low_order);
        let mut s_min = system.specific_entropy(i_low_order);

        for col in 1..row.row_length() {
            let u_j = low_order_of(col);
            let rho_j = system.density(&u_j);
            rho_min = rho_min.min(rho_j);
            rho_max = rho_max.max(rho_j);
            rhoe_min = rhoe_min.min(system.internal_energy_density(&u_j));
            s_min = s_min.min(system.specific_entropy(&u_j));
        }

        if self.relax_bounds > 0.0 {
            rho_min -= self.relax_bounds * (rho_i - rho_min).abs();
            rho_max += self.relax_bounds * (rho_max - rho_i).abs();
            if rhoe_min.is_finite() {
                rhoe_min -= self.relax_bounds * rhoe_min.abs().max(1e-12);
            }
            if s_min.is_finite() {
                s_min -= self.relax_bounds * s_min.abs().max(1e-12);
            }
        }

        LimiterBounds {
            rho_min,
            rho_max,
            rhoe_min,
            s_min,
        }
    }

    fn edge_limit(&self, system: &S, u_low: &StateArray, p_ij: &StateArray, bounds: &LimiterBounds) -> Real {
        const EPS: Real = 1e-300;

        let rho_low = system.density(u_low);
        let rho_p = system.density(p_ij);
        let mut l = 1.0;
        if rho_p > EPS {
            l = l.min(safe_division(bounds.rho_max - rho_low, rho_p));
        } else if rho_p < -EPS {
            l = l.min(safe_division(bounds.rho_min - rho_low, rho_p));
        }
        l = l.clamp(0.0, 1.0);

        if bounds.rhoe_min.is_finite() {
            let f = |x: Real| system.internal_energy_density(&state_at(u_low, p_ij, x)) - bounds.rhoe_min;
            l = largest_feasible_l(f, 0.0, l, &self.line_search);
        }

        if bounds.s_min.is_finite() {
            let f = |x: Real| system.specific_entropy(&state_at(u_low, p_ij, x)) - bounds.s_min;
            l = largest_feasible_l(f, 0.0, l, &self.line_search);
        }

        l.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::NodeIndex;
    use hv_equations::{EulerAeos, PolytropicGasEos};

    #[test]
    fn edge_limit_is_one_for_zero_increment() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = system.from_primitive(&[1.0, 0.0, 2.5, 0.0, 0.0]);
        let limiter = ConvexLimiter::default();
        let bounds = LimiterBounds {
            rho_min: 0.5,
            rho_max: 1.5,
            rhoe_min: 0.1,
            s_min: 0.0,
        };
        let p_ij = [0.0; hv_core::MAX_COMPONENTS];
        let l = limiter.edge_limit(&system, &u, &p_ij, &bounds);
        assert!((l - 1.0).abs() < 1e-9);
    }

    #[test]
    fn edge_limit_clamps_to_density_box() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u = system.from_primitive(&[1.0, 0.0, 2.5, 0.0, 0.0]);
        let limiter = ConvexLimiter::default();
        let bounds = LimiterBounds {
            rho_min: 1.0,
            rho_max: 1.2,
            rhoe_min: 0.0,
            s_min: 0.0,
        };
        let mut p_ij = [0.0; hv_core::MAX_COMPONENTS];
        p_ij[0] = 1.0; // would push density to 2.0 at l=1
        let l = limiter.edge_limit(&system, &u, &p_ij, &bounds);
        assert!(l <= 0.2 + 1e-6);
        assert!(l >= 0.0);
    }

    #[test]
    fn node_bounds_spans_one_ring_density() {
        let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
        let u_i = system.from_primitive(&[1.0, 0.0, 2.5, 0.0, 0.0]);
        let u_j = system.from_primitive(&[0.5, 0.0, 2.5, 0.0, 0.0]);
        let limiter = ConvexLimiter::default();
        let columns = [NodeIndex::from_index(0), NodeIndex::from_index(1)];
        let c_ij = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let norm_cij = [0.0, 1.0];
        let row = SparseRowView {
            columns: &columns,
            c_ij: &c_ij,
            norm_cij: &norm_cij,
        };
        let bounds = limiter.node_bounds(&system, &u_i, row, &|_| u_j);
        assert!((bounds.rho_min - 0.5).abs() < 1e-9);
        assert!((bounds.rho_max - 1.0).abs() < 1e-9);
    }
}
