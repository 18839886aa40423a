//! The four per-equation capability providers and the
//! `Equation` trait that binds them at compile time.

use crate::numeric::Real;
use crate::precomputed::PrecomputedArray;
use crate::sparse::{BoundaryData, BoundaryId, SparseRowView};
use crate::state::StateArray;

/// Contract a PDE system must satisfy to plug into the update loop
/// . All methods are pointwise or per-edge; one-ring
/// aggregation (e.g. `gamma_min`) is driven by the kernel, which folds
/// `precompute_seed`/`precompute_fold` across a row.
pub trait HyperbolicSystemView: Send + Sync {
    /// `2+d` for Euler, `1+d` for shallow water.
    const NUM_COMPONENTS: usize;
    /// Number of scalars in the per-node precomputed tuple.
    const NUM_PRECOMPUTED: usize;
    /// Number of barrier-separated precompute sweeps (1 or 2).
    const NUM_PRECOMPUTE_CYCLES: usize;

    /// Directional flux tensor contracted with `n`, i.e. `F(U) . n`.
    fn flux(&self, u: &StateArray, precomputed: &PrecomputedArray, n: [f64; 3], out: &mut StateArray);

    fn to_primitive(&self, u: &StateArray) -> StateArray;
    fn from_primitive(&self, v: &StateArray) -> StateArray;

    /// `rho > 0` and the EOS-shifted internal energy inequality.
    fn is_admissible(&self, u: &StateArray, precomputed: &PrecomputedArray) -> bool;

    /// Cycle 0: per-node quantities that do not require a one-ring walk
    /// (pressure, surrogate gamma for Euler-AEOS).
    fn precompute_cycle0(&self, u: &StateArray) -> PrecomputedArray;

    /// A scalar folded (by minimum) across the one-ring between cycle 0 and
    /// cycle 1, e.g. the surrogate gamma itself for Euler-AEOS. Systems with
    /// only one precompute cycle return `+inf` (identity for min) and ignore
    /// the result in `precompute_cycle1`.
    fn precompute_fold_seed(&self, cycle0: &PrecomputedArray) -> Real {
        let _ = cycle0;
        Real::INFINITY
    }

    /// Cycle 1: finishes the precomputed tuple using the one-ring-reduced
    /// scalar from `precompute_fold_seed` (`gamma_min` for Euler-AEOS).
    fn precompute_cycle1(
        &self,
        u: &StateArray,
        cycle0: &PrecomputedArray,
        folded: Real,
) -> PrecomputedArray {
        let _ = folded;
        *cycle0
    }

    /// 1-D Riemann data `(rho, v_n, p, a)` formed from the normal component
    /// of `u` along `n`, plus the surrogate `gamma_min` used by the
    /// approximate Riemann solver's two-rarefaction bound.
    fn riemann_primitive_1d(
        &self,
        u: &StateArray,
        precomputed: &PrecomputedArray,
        n: [f64; 3],
) -> RiemannPrimitive1D;

    fn apply_boundary(&self, id: BoundaryId, u: &StateArray, data: &BoundaryData) -> StateArray;

    /// The limiter's density-box scalar (`rho` for Euler, `h` for shallow
    /// water). Defaults to component 0, true for every system built so far.
    fn density(&self, u: &StateArray) -> Real {
        u[0]
    }

    /// `rho * e`, the scalar the internal-energy-positivity bound
    /// constrains. Systems with no internal energy (shallow water, scalar
    /// advection) return `+inf`, the identity for a `>=` constraint, so the
    /// limiter's root-finding step sees it as always satisfied.
    fn internal_energy_density(&self, u: &StateArray) -> Real {
        let _ = u;
        Real::INFINITY
    }

    /// Specific entropy surrogate the entropy-inequality bound constrains.
    /// Defaults to `+inf` (unconstrained) for systems with no surrogate
    /// entropy of their own.
    fn specific_entropy(&self, u: &StateArray) -> Real {
        let _ = u;
        Real::INFINITY
    }
}

/// 1-D reduction of a conserved state along a direction, consumed by
/// `RiemannSolver` implementations.
#[derive(Clone, Copy, Debug)]
pub struct RiemannPrimitive1D {
    pub rho: Real,
    pub v_n: Real,
    pub p: Real,
    pub a: Real,
    pub gamma_min: Real,
}

/// Result of an approximate Riemann solve: an upper bound on the maximum
/// wave speed, plus diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct RiemannResult {
    pub lambda_max: Real,
    pub p_star: Real,
    pub iterations: u32,
}

/// Upper-bound approximate Riemann solver . Generic over the
/// system so the inner Newton iteration can inline the EOS call.
pub trait RiemannSolver<S: HyperbolicSystemView>: Send + Sync {
    fn compute(
        &self,
        system: &S,
        u_i: &StateArray,
        precomputed_i: &PrecomputedArray,
        u_j: &StateArray,
        precomputed_j: &PrecomputedArray,
        n_ij: [f64; 3],
) -> RiemannResult;
}

/// Per-node smoothness/entropy-residual indicator.
pub trait Indicator<S: HyperbolicSystemView>: Send + Sync {
    /// `alpha_i in [0, 1]`, blending low-order-only (0) and full high-order
    /// correction (1). `row` is node `i`'s one-ring; `state_of` and
    /// `precomputed_of` fetch neighbor data by column index within the row.
    #[allow(clippy::too_many_arguments)]
    fn node_indicator(
        &self,
        system: &S,
        i_state: &StateArray,
        i_precomputed: &PrecomputedArray,
        row: SparseRowView<'_>,
        state_of: &dyn Fn(usize) -> StateArray,
        precomputed_of: &dyn Fn(usize) -> PrecomputedArray,
) -> Real;
}

/// Per-node bounds the convex limiter must enforce.
#[derive(Clone, Copy, Debug)]
pub struct LimiterBounds {
    pub rho_min: Real,
    pub rho_max: Real,
    pub rhoe_min: Real,
    pub s_min: Real,
}

/// Convex limiter: computes per-node bounds and the largest admissible
/// `l_ij in [0, 1]` for a candidate high-order increment.
pub trait Limiter<S: HyperbolicSystemView>: Send + Sync {
    fn node_bounds(
        &self,
        system: &S,
        i_low_order: &StateArray,
        row: SparseRowView<'_>,
        low_order_of: &dyn Fn(usize) -> StateArray,
) -> LimiterBounds;

    /// Largest `l in [0, 1]` such that `u_low + l * p_ij` satisfies `bounds`.
    fn edge_limit(
        &self,
        system: &S,
        u_low: &StateArray,
        p_ij: &StateArray,
        bounds: &LimiterBounds,
) -> Real;
}

/// Collaborator for an equation's implicit parabolic substep. The substep
/// itself stays out of scope ; every `Equation` still wires
/// this associated type so a future viscous variant can be added without
/// widening the trait again. `NoParabolic` is the only implementor until
/// that substep exists.
pub trait ParabolicCollaborator: Send + Sync {}

/// No-op `ParabolicCollaborator`.
pub struct NoParabolic;
impl ParabolicCollaborator for NoParabolic {}

/// Compile-time binding of the four capability providers for one PDE,
/// plus the dimension/sizing constants. A pure marker type:
/// no runtime state, instantiated once per `(dimension, equation)` pair by
/// the equation registry (`hv-app`), never via global/static registration.
///
/// This is the type-level catalog of supported systems (see
/// `hv-equations::catalog`); the registry's actual runtime dispatch goes
/// through the erased capability enums in `hv-app::registry` instead, since
/// indicator/Riemann-solver/limiter choice is a configuration-time, not
/// compile-time, decision there.
pub trait Equation: Send + Sync {
    type System: HyperbolicSystemView;
    type Riemann: RiemannSolver<Self::System>;
    type Ind: Indicator<Self::System>;
    type Lim: Limiter<Self::System>;
    type Parabolic: ParabolicCollaborator;

    const PROBLEM_DIMENSION: usize;
    const N_PRECOMPUTED_VALUES: usize;
    const N_PRECOMPUTATION_CYCLES: usize;
}
