//! Equations of state for the Euler-AEOS system, and the surrogate-gamma
//! machinery shared by the arbitrary-EOS formulas.

use hv_core::{positive_part, safe_division, safe_sqrt, Real};

/// An equation of state providing the caloric closure `p = p(rho, e)` plus
/// the NASG-family shift parameters the surrogate-gamma formulas need.
///
/// `PREFERS_VECTOR` selects the "vector EOS" precompute path: when `true`,
/// the caller gathers `rho`/`e` for a whole SIMD block
/// into scratch arrays and calls [`EquationOfState::pressure_batch`] once
/// instead of calling [`EquationOfState::pressure`] per lane.
pub trait EquationOfState: Send + Sync {
    const PREFERS_VECTOR: bool = false;

    /// Energy shift `q` (J/kg).
    fn q(&self) -> Real {
        0.0
    }

    /// Reference/stiffening pressure `p_infty` (Pa). Left at its default of
    /// zero for EOS families (van der Waals) that do not define one — the
    /// limiter's entropy bound must not assume `p + p_infty > 0`.
    fn p_infty(&self) -> Real {
        0.0
    }

    /// Covolume `b` (m^3/kg).
    fn b(&self) -> Real {
        0.0
    }

    /// Pressure from density and specific internal energy.
    fn pressure(&self, rho: Real, e: Real) -> Real;

    /// Batched pressure evaluation for the vector EOS path. The default
    /// implementation simply loops; EOS backends with genuine vectorized
    /// kernels (e.g. a tabulated lookup using SIMD gather) override it.
    fn pressure_batch(&self, rho: &[Real], e: &[Real], out: &mut [Real]) {
        for ((r, e), p) in rho.iter().zip(e).zip(out) {
            *p = self.pressure(*r, *e);
        }
    }
}

/// `p = (gamma - 1) * rho * e`.
#[derive(Clone, Copy, Debug)]
pub struct PolytropicGasEos {
    pub gamma: Real,
}

impl EquationOfState for PolytropicGasEos {
    fn pressure(&self, rho: Real, e: Real) -> Real {
        (self.gamma - 1.0) * rho * e
    }
}

/// Noble-Abel stiffened gas: `p = (gamma-1) rho (e - q) / (1 - b rho) -
/// gamma p_infty`.
#[derive(Clone, Copy, Debug)]
pub struct NobleAbelStiffenedGasEos {
    pub gamma: Real,
    pub covolume_b: Real,
    pub p_infty: Real,
    pub q: Real,
}

impl EquationOfState for NobleAbelStiffenedGasEos {
    fn q(&self) -> Real {
        self.q
    }

    fn p_infty(&self) -> Real {
        self.p_infty
    }

    fn b(&self) -> Real {
        self.covolume_b
    }

    fn pressure(&self, rho: Real, e: Real) -> Real {
        let covolume = 1.0 - self.covolume_b * rho;
        let num = (self.gamma - 1.0) * rho * (e - self.q);
        safe_division(num, covolume) - self.gamma * self.p_infty
    }
}

/// Van der Waals gas, caloric form `e = cv*T - a*rho`, mechanical form
/// `p = rho R T / (1 - b rho) - a rho^2`. No stiffening pressure is
/// defined for this family (`p_infty` stays at its default of zero) —
/// this EOS can and does produce negative pressures, which the limiter's
/// entropy bound must not paper over.
#[derive(Clone, Copy, Debug)]
pub struct VanDerWaalsEos {
    pub gamma: Real,
    pub attraction_a: Real,
    pub covolume_b: Real,
    pub gas_constant_r: Real,
}

impl EquationOfState for VanDerWaalsEos {
    fn b(&self) -> Real {
        self.covolume_b
    }

    fn pressure(&self, rho: Real, e: Real) -> Real {
        let cv = safe_division(self.gas_constant_r, self.gamma - 1.0);
        let temperature = safe_division(e + self.attraction_a * rho, cv);
        let covolume = 1.0 - self.covolume_b * rho;
        safe_division(rho * self.gas_constant_r * temperature, covolume)
            - self.attraction_a * rho * rho
    }
}

/// A simplified one-dimensional tabulated EOS: pressure as a monotone
/// piecewise-linear function of density alone, independent of `e`. A full
/// tabulated EOS (2-D in `(rho, e)`, sourced from an external property
/// table) is out of scope here; this stands in for a configured
/// `equation of state = tabulated` option well enough to exercise the
/// dispatch path and is rejected at configuration time
/// (`EquationError::Unimplemented`) if a caller asks for genuine 2-D
/// tabulated behavior.
#[derive(Clone, Debug)]
pub struct TabulatedEos {
    rho_grid: Vec<Real>,
    p_grid: Vec<Real>,
}

impl TabulatedEos {
    /// `points` must be sorted by density and have at least two entries.
    pub fn from_points(points: Vec<(Real, Real)>) -> Self {
        assert!(points.len() >= 2, "tabulated EOS needs >= 2 points");
        let rho_grid = points.iter().map(|(r, _)| *r).collect();
        let p_grid = points.iter().map(|(_, p)| *p).collect();
        Self { rho_grid, p_grid }
    }
}

impl EquationOfState for TabulatedEos {
    fn pressure(&self, rho: Real, _e: Real) -> Real {
        let n = self.rho_grid.len();
        if rho <= self.rho_grid[0] {
            return self.p_grid[0];
        }
        if rho >= self.rho_grid[n - 1] {
            return self.p_grid[n - 1];
        }
        let k = self
            .rho_grid
            .partition_point(|&r| r <= rho)
            .clamp(1, n - 1);
        let (r0, r1) = (self.rho_grid[k - 1], self.rho_grid[k]);
        let (p0, p1) = (self.p_grid[k - 1], self.p_grid[k]);
        let t = safe_division(rho - r0, r1 - r0);
        p0 + t * (p1 - p0)
    }
}

/// Surrogate gamma:
/// `gamma = 1 + (p+p_infty)(1-b*rho) / (rho(e-q) - p_infty(1-b*rho))`,
/// with the numerator clamped `>= 0` and the denominator clamped away from
/// zero.
pub fn surrogate_gamma(rho: Real, e: Real, p: Real, q: Real, p_infty: Real, b: Real) -> Real {
    let covolume = 1.0 - b * rho;
    let numerator = positive_part((p + p_infty) * covolume);
    let denominator = rho * (e - q) - p_infty * covolume;
    1.0 + safe_division(numerator, denominator)
}

/// Exact inverse of [`surrogate_gamma`]: recovers `p` from `gamma`.
pub fn surrogate_pressure(rho: Real, e: Real, gamma: Real, q: Real, p_infty: Real, b: Real) -> Real {
    let covolume = 1.0 - b * rho;
    let inner = rho * (e - q) - p_infty * covolume;
    safe_division((gamma - 1.0) * inner, covolume) - p_infty
}

/// Surrogate sound speed, given the *shifted* specific internal energy
/// `e - q`.
pub fn surrogate_sound_speed(rho: Real, e_shifted: Real, gamma: Real, p_infty: Real, b: Real) -> Real {
    let covolume = 1.0 - b * rho;
    let inner = rho * e_shifted - p_infty * covolume;
    let num = gamma * (gamma - 1.0) * positive_part(inner);
    let den = rho * covolume * covolume;
    safe_sqrt(safe_division(num, den))
}

/// Specific entropy surrogate :
/// `s = (rho(e-q) - p_infty(1-b*rho)) * (1/rho - b)^gamma_min / (1-b*rho)`.
pub fn specific_entropy_surrogate(
    rho: Real,
    e_shifted: Real,
    gamma_min: Real,
    p_infty: Real,
    b: Real,
) -> Real {
    let covolume = 1.0 - b * rho;
    let inner = rho * e_shifted - p_infty * covolume;
    let specific_volume_term = positive_part(safe_division(1.0, rho) - b).powf(gamma_min);
    safe_division(inner * specific_volume_term, covolume)
}

/// Harten-entropy surrogate :
/// `eta = { [rho^2(e-q) - rho p_infty(1-b rho)]^+ * (1-b rho)^(gamma_min-1) }^(1/(gamma_min+1))`.
pub fn harten_entropy_surrogate(
    rho: Real,
    e_shifted: Real,
    gamma_min: Real,
    p_infty: Real,
    b: Real,
) -> Real {
    let covolume = 1.0 - b * rho;
    let bracket = positive_part(rho * rho * e_shifted - rho * p_infty * covolume);
    let powered = bracket * covolume.powf(gamma_min - 1.0);
    positive_part(powered).powf(safe_division(1.0, gamma_min + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polytropic_pressure_matches_ideal_gas() {
        let eos = PolytropicGasEos { gamma: 1.4 };
        assert!((eos.pressure(1.0, 2.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn surrogate_gamma_pressure_round_trip() {
        let rho = 1.2;
        let e = 2.1;
        let p = (1.4 - 1.0) * rho * e;
        let gamma = surrogate_gamma(rho, e, p, 0.0, 0.0, 0.0);
        assert!((gamma - 1.4).abs() < 1e-9);
        let p2 = surrogate_pressure(rho, e, gamma, 0.0, 0.0, 0.0);
        assert!((p2 - p).abs() < 1e-9 * p.abs().max(1.0));
    }

    #[test]
    fn surrogate_gamma_pressure_round_trip_with_nasg_shifts() {
        let eos = NobleAbelStiffenedGasEos {
            gamma: 1.3,
            covolume_b: 0.01,
            p_infty: 1.0e8,
            q: 5.0e5,
        };
        let rho = 800.0;
        let e = 1.5e6;
        let p = eos.pressure(rho, e);
        let gamma = surrogate_gamma(rho, e, p, eos.q, eos.p_infty, eos.covolume_b);
        let p2 = surrogate_pressure(rho, e, gamma, eos.q, eos.p_infty, eos.covolume_b);
        assert!((p2 - p).abs() < 1e-6 * p.abs().max(1.0));
    }

    #[test]
    fn sound_speed_is_never_negative_under_radical() {
        // A pathological negative-shifted-energy input must clamp to 0,
        // not panic on a negative sqrt argument.
        let c = surrogate_sound_speed(1.0, -10.0, 1.4, 0.0, 0.0);
        assert!(c >= 0.0);
        assert!(c.is_finite());
    }

    #[test]
    fn tabulated_eos_interpolates_monotonically() {
        let eos = TabulatedEos::from_points(vec![(1.0, 1.0e5), (2.0, 3.0e5), (4.0, 9.0e5)]);
        let p_mid = eos.pressure(1.5, 0.0);
        assert!((p_mid - 2.0e5).abs() < 1e-6);
        assert_eq!(eos.pressure(0.0, 0.0), 1.0e5);
        assert_eq!(eos.pressure(100.0, 0.0), 9.0e5);
    }
}
