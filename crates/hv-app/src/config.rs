//! YAML project schema: serde DTOs kept separate from the runtime types
//! they configure -- `build_equation` (in `registry`) is this file's
//! `validate`.

use hv_core::Real;
use hv_step::IdViolationStrategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EosConfig {
    Polytropic {
        gamma: Real,
    },
    NobleAbelStiffenedGas {
        gamma: Real,
        #[serde(default)]
        covolume_b: Real,
        #[serde(default)]
        p_infty: Real,
        #[serde(default)]
        q: Real,
    },
    VanDerWaals {
        gamma: Real,
        attraction_a: Real,
        covolume_b: Real,
        gas_constant_r: Real,
    },
    Tabulated {
        /// `(density, pressure)` pairs, sorted by density.
        points: Vec<(Real, Real)>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EquationKind {
    /// `EulerAeos` parameterized by `eos`.
    EulerAeos { eos: EosConfig },
    /// Fixed-`gamma` specialization; `eos` is ignored if present.
    PolytropicEuler { gamma: Real },
    ShallowWater { gravity: Real },
    /// Linear scalar advection, no EOS.
    Skeleton { beta: [Real; 3] },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquationDispatchConfig {
    pub dimension: usize,
    pub equation: EquationKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum IndicatorConfig {
    Zero,
    One,
    Smoothness { field: FieldSelectorConfig },
    EntropyViscosity,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldSelectorConfig {
    Density,
    InternalEnergy,
    Pressure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RiemannSolverConfig {
    GuermondPopov {
        #[serde(default = "default_newton_max_iter")]
        newton_max_iter: u32,
        #[serde(default = "default_newton_eps")]
        newton_eps: f64,
    },
    Noop,
}

fn default_newton_max_iter() -> u32 {
    100
}

fn default_newton_eps() -> f64 {
    1e-10
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LimiterConfig {
    #[serde(default)]
    pub relax_bounds: Real,
    #[serde(default = "default_line_search_eps")]
    pub line_search_eps: Real,
    #[serde(default = "default_line_search_max_iter")]
    pub line_search_max_iter: u32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            relax_bounds: 0.0,
            line_search_eps: default_line_search_eps(),
            line_search_max_iter: default_line_search_max_iter(),
        }
    }
}

fn default_line_search_eps() -> Real {
    1e-10
}

fn default_line_search_max_iter() -> u32 {
    64
}

/// `HyperbolicModule` : the per-equation-instance runtime knobs,
/// independent of which equation/dimension they're attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HyperbolicModuleConfig {
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub riemann: RiemannSolverConfig,
    #[serde(default)]
    pub limiter: LimiterConfig,
    #[serde(default = "default_cfl_number")]
    pub cfl_number: Real,
    #[serde(default)]
    pub id_violation_strategy: IdViolationStrategy,
    #[serde(default = "default_limiter_iterations")]
    pub limiter_iterations: u32,
}

impl Default for RiemannSolverConfig {
    fn default() -> Self {
        RiemannSolverConfig::GuermondPopov {
            newton_max_iter: default_newton_max_iter(),
            newton_eps: default_newton_eps(),
        }
    }
}

fn default_cfl_number() -> Real {
    1.0
}

fn default_limiter_iterations() -> u32 {
    2
}

/// One `(dimension, equation)` instance plus the module config driving it
/// -- a full `RunConfig` is a named list of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquationInstanceConfig {
    pub name: String,
    pub dispatch: EquationDispatchConfig,
    pub module: HyperbolicModuleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RunConfig {
    #[serde(default)]
    pub equations: Vec<EquationInstanceConfig>,
}

pub fn load_yaml(path: &std::path::Path) -> crate::error::ConfigResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &RunConfig) -> crate::error::ConfigResult<()> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn polytropic_gamma_roundtrips_through_yaml(gamma in 1.01_f64..3.0) {
            let dispatch = EquationDispatchConfig {
                dimension: 1,
                equation: EquationKind::PolytropicEuler { gamma },
            };
            let text = serde_yaml::to_string(&dispatch).unwrap();
            let back: EquationDispatchConfig = serde_yaml::from_str(&text).unwrap();
            prop_assert_eq!(dispatch, back);
        }

        #[test]
        fn cfl_number_roundtrips_and_stays_positive(cfl in 0.01_f64..1.0) {
            let module = HyperbolicModuleConfig {
                indicator: IndicatorConfig::Zero,
                riemann: RiemannSolverConfig::default(),
                limiter: LimiterConfig::default(),
                cfl_number: cfl,
                id_violation_strategy: IdViolationStrategy::Warn,
                limiter_iterations: 2,
            };
            let text = serde_yaml::to_string(&module).unwrap();
            let back: HyperbolicModuleConfig = serde_yaml::from_str(&text).unwrap();
            prop_assert_eq!(module, back);
            prop_assert!(back.cfl_number > 0.0);
        }
    }
}
