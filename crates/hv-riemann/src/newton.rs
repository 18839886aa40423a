//! Scalar bracketed Newton solve: a line-search/fallback shape collapsed
//! down to a single scalar unknown -- no Jacobian matrix, a bisection step
//! standing in for an SVD pseudo-inverse fallback when the Newton step
//! would leave the bracket.

use crate::error::RiemannError;

#[derive(Clone, Copy, Debug)]
pub struct ScalarNewtonConfig {
    pub max_iterations: u32,
    pub abs_tol: f64,
}

impl Default for ScalarNewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-12,
        }
    }
}

/// Finds a root of `f` inside `[lo, hi]` (with `f(lo)` and `f(hi)` of
/// opposite sign), using Newton's method seeded at `x0` and falling back to
/// bisection whenever a Newton step would leave the current bracket or the
/// derivative is degenerate.
pub fn bracketed_newton<F, D>(
    x0: f64,
    mut lo: f64,
    mut hi: f64,
    f: F,
    fprime: D,
    config: &ScalarNewtonConfig,
) -> Result<(f64, u32), RiemannError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return Ok((lo, 0));
    }
    if f_hi == 0.0 {
        return Ok((hi, 0));
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(RiemannError::InvalidBracket { lo, hi });
    }

    let mut x = x0.clamp(lo, hi);
    let mut fx = f(x);

    for iter in 0..config.max_iterations {
        if fx.abs() < config.abs_tol {
            return Ok((x, iter));
        }

        if fx.signum() == f_lo.signum() {
            lo = x;
            f_lo = fx;
        } else {
            hi = x;
        }

        let dfx = fprime(x);
        let newton_step = if dfx.abs() > 1e-300 { x - fx / dfx } else { f64::NAN };

        let x_next = if newton_step.is_finite() && newton_step > lo && newton_step < hi {
            newton_step
        } else {
            0.5 * (lo + hi)
        };

        if (x_next - x).abs() < config.abs_tol * x.abs().max(1.0) {
            return Ok((x_next, iter + 1));
        }

        x = x_next;
        fx = f(x);
    }

    Err(RiemannError::NotConverged {
        iterations: config.max_iterations,
        residual: fx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_sqrt_two() {
        let config = ScalarNewtonConfig::default();
        let (root, _) = bracketed_newton(
            1.0,
            0.0,
            2.0,
            |x| x * x - 2.0,
            |x| 2.0 * x,
            &config,
        )
        .unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_bisection_with_zero_derivative() {
        let config = ScalarNewtonConfig::default();
        let (root, _) = bracketed_newton(0.5, 0.0, 1.0, |x| x - 0.3, |_| 0.0, &config).unwrap();
        assert!((root - 0.3).abs() < 1e-9);
    }
}
