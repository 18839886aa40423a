//! Scalar type and floating-point safety helpers shared by every core crate.

/// Floating point type used throughout the hyperbolic update loop.
pub type Real = f64;

/// Precision-dependent constants the Riemann solver and limiter root-finders
/// bracket their Newton iterations with.
///
/// Implemented for `f32` and `f64` so the inner loops can in principle be
/// monomorphized over precision (see `SPEC_FULL.md` §3); the shipped
/// equation registry only instantiates the `f64` path.
pub trait FloatTolerance: Copy + Sized {
    /// Relative-update tolerance for Newton iteration early exit.
    const NEWTON_EPS: Self;
    /// Smallest denominator `safe_division` will accept before clamping.
    const DIVISION_FLOOR: Self;
}

impl FloatTolerance for f64 {
    const NEWTON_EPS: Self = 1e-10;
    const DIVISION_FLOOR: Self = 1e-14;
}

impl FloatTolerance for f32 {
    const NEWTON_EPS: Self = 1e-5;
    const DIVISION_FLOOR: Self = 1e-7;
}

/// One tolerance pair for approximate-equality checks in tests.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Clamp a numerator to be non-negative before a division (§4.B surrogate γ).
#[inline]
pub fn positive_part(v: Real) -> Real {
    if v > 0.0 { v } else { 0.0 }
}

/// Divide `num / den`, clamping `den` away from zero so the quotient never
/// overflows or becomes non-finite from a near-singular denominator.
///
/// This is the single point where the "numerator clamped >= 0, denominator
/// clamped >= eps" rule is implemented; every surrogate EOS quantity routes
/// through it.
#[inline]
pub fn safe_division(num: Real, den: Real) -> Real {
    let den_safe = if den.abs() < Real::DIVISION_FLOOR {
        Real::DIVISION_FLOOR.copysign(den)
    } else {
        den
    };
    num / den_safe
}

/// `sqrt` of a clamped-nonnegative radicand (sound speed, entropy surrogates).
#[inline]
pub fn safe_sqrt(v: Real) -> Real {
    positive_part(v).sqrt()
}
