//! Type-level catalog of `Equation` bindings : one marker
//! type per supported system, fixing a default Riemann solver/indicator/
//! limiter combination and the dimension/precompute-sizing constants. This
//! is the compile-time enumeration the `Equation` trait exists for --
//! `hv-app::registry` still does the actual runtime dispatch through its
//! own erased capability enums, since indicator/Riemann-solver/limiter
//! choice is a configuration-time decision there, not a compile-time one.

use hv_core::{Equation, HyperbolicSystemView, NoParabolic};
use hv_limiter::{ConvexLimiter, ZeroIndicator};
use hv_riemann::{GuermondPopovSolver, NoopRiemannSolver};

use crate::eos::PolytropicGasEos;
use crate::euler_aeos::EulerAeos;
use crate::euler_polytropic::PolytropicEuler;
use crate::shallow_water::ShallowWater;
use crate::skeleton::ScalarAdvection;

fn sizing<S: HyperbolicSystemView>() -> (usize, usize) {
    (S::NUM_PRECOMPUTED, S::NUM_PRECOMPUTE_CYCLES)
}

/// Catalog entry for the general arbitrary-EOS Euler system, fixed here to
/// `PolytropicGasEos` -- the catalog only needs one representative EOS per
/// entry, since `hv-app::registry` is what actually picks the EOS at
/// configuration time.
pub struct EulerAeosEquation<const DIM: usize>;

impl<const DIM: usize> Equation for EulerAeosEquation<DIM> {
    type System = EulerAeos<PolytropicGasEos, DIM>;
    type Riemann = GuermondPopovSolver;
    type Ind = ZeroIndicator;
    type Lim = ConvexLimiter;
    type Parabolic = NoParabolic;

    const PROBLEM_DIMENSION: usize = DIM;
    const N_PRECOMPUTED_VALUES: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_PRECOMPUTED;
    const N_PRECOMPUTATION_CYCLES: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_PRECOMPUTE_CYCLES;
}

/// Catalog entry for the fixed-gamma Euler specialization.
pub struct PolytropicEulerEquation<const DIM: usize>;

impl<const DIM: usize> Equation for PolytropicEulerEquation<DIM> {
    type System = PolytropicEuler<DIM>;
    type Riemann = GuermondPopovSolver;
    type Ind = ZeroIndicator;
    type Lim = ConvexLimiter;
    type Parabolic = NoParabolic;

    const PROBLEM_DIMENSION: usize = DIM;
    const N_PRECOMPUTED_VALUES: usize = PolytropicEuler::<DIM>::NUM_PRECOMPUTED;
    const N_PRECOMPUTATION_CYCLES: usize = PolytropicEuler::<DIM>::NUM_PRECOMPUTE_CYCLES;
}

/// Catalog entry for shallow water.
pub struct ShallowWaterEquation<const DIM: usize>;

impl<const DIM: usize> Equation for ShallowWaterEquation<DIM> {
    type System = ShallowWater<DIM>;
    type Riemann = GuermondPopovSolver;
    type Ind = ZeroIndicator;
    type Lim = ConvexLimiter;
    type Parabolic = NoParabolic;

    const PROBLEM_DIMENSION: usize = DIM;
    const N_PRECOMPUTED_VALUES: usize = ShallowWater::<DIM>::NUM_PRECOMPUTED;
    const N_PRECOMPUTATION_CYCLES: usize = ShallowWater::<DIM>::NUM_PRECOMPUTE_CYCLES;
}

/// Catalog entry for the minimal scalar-advection regression system.
/// `Skeleton` has no notion of dimension beyond the 3-component `beta`
/// vector it's constructed with, so `PROBLEM_DIMENSION` is fixed at 1.
pub struct SkeletonEquation;

impl Equation for SkeletonEquation {
    type System = ScalarAdvection;
    type Riemann = NoopRiemannSolver;
    type Ind = ZeroIndicator;
    type Lim = ConvexLimiter;
    type Parabolic = NoParabolic;

    const PROBLEM_DIMENSION: usize = 1;
    const N_PRECOMPUTED_VALUES: usize = ScalarAdvection::NUM_PRECOMPUTED;
    const N_PRECOMPUTATION_CYCLES: usize = ScalarAdvection::NUM_PRECOMPUTE_CYCLES;
}

/// Reserved catalog slot for a future compressible Navier-Stokes system.
/// The implicit parabolic (viscous) substep stays out of scope; this entry
/// exists so the registry enumerates five systems even though only the
/// hyperbolic (Euler) half is built --
/// it reuses `EulerAeos` as its `System` since there is no separate viscous
/// state representation yet, and wires `NoParabolic` rather than a real
/// collaborator.
pub struct NavierStokesPlaceholderEquation<const DIM: usize>;

impl<const DIM: usize> Equation for NavierStokesPlaceholderEquation<DIM> {
    type System = EulerAeos<PolytropicGasEos, DIM>;
    type Riemann = GuermondPopovSolver;
    type Ind = ZeroIndicator;
    type Lim = ConvexLimiter;
    type Parabolic = NoParabolic;

    const PROBLEM_DIMENSION: usize = DIM;
    const N_PRECOMPUTED_VALUES: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_PRECOMPUTED;
    const N_PRECOMPUTATION_CYCLES: usize = EulerAeos::<PolytropicGasEos, DIM>::NUM_PRECOMPUTE_CYCLES;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_equation<E: Equation>() {
        let _ = sizing::<E::System>();
    }

    #[test]
    fn all_five_catalog_entries_bind() {
        assert_equation::<EulerAeosEquation<1>>();
        assert_equation::<PolytropicEulerEquation<2>>();
        assert_equation::<ShallowWaterEquation<1>>();
        assert_equation::<SkeletonEquation>();
        assert_equation::<NavierStokesPlaceholderEquation<3>>();
    }

    #[test]
    fn problem_dimension_matches_the_const_generic() {
        assert_eq!(EulerAeosEquation::<2>::PROBLEM_DIMENSION, 2);
        assert_eq!(PolytropicEulerEquation::<3>::PROBLEM_DIMENSION, 3);
        assert_eq!(ShallowWaterEquation::<1>::PROBLEM_DIMENSION, 1);
    }
}
