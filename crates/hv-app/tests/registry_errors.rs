//! Construction-time rejection of unsupported configurations ,
//! mirrored after `tf-project`'s `validation_fails_on_missing_node` test.

use hv_app::{ConfigError, EosConfig, EquationDispatchConfig, EquationKind, HyperbolicModuleConfig, IndicatorConfig};

fn minimal_module() -> HyperbolicModuleConfig {
    HyperbolicModuleConfig {
        indicator: IndicatorConfig::Zero,
        riemann: hv_app::RiemannSolverConfig::default(),
        limiter: hv_app::LimiterConfig::default(),
        cfl_number: 1.0,
        id_violation_strategy: hv_step::IdViolationStrategy::Warn,
        limiter_iterations: 1,
    }
}

#[test]
fn euler_aeos_rejects_unsupported_dimension() {
    let dispatch = EquationDispatchConfig {
        dimension: 4,
        equation: EquationKind::EulerAeos {
            eos: EosConfig::Polytropic { gamma: 1.4 },
        },
    };
    let err = hv_app::build_equation(&dispatch, &minimal_module()).unwrap_err();
    assert!(matches!(err, ConfigError::Equation(_)));
}

#[test]
fn shallow_water_rejects_three_dimensions() {
    let dispatch = EquationDispatchConfig {
        dimension: 3,
        equation: EquationKind::ShallowWater { gravity: 9.81 },
    };
    let err = hv_app::build_equation(&dispatch, &minimal_module()).unwrap_err();
    assert!(matches!(err, ConfigError::Equation(_)));
}

#[test]
fn tabulated_eos_rejects_fewer_than_two_points() {
    let dispatch = EquationDispatchConfig {
        dimension: 1,
        equation: EquationKind::EulerAeos {
            eos: EosConfig::Tabulated {
                points: vec![(1.0, 1.0)],
            },
        },
    };
    let err = hv_app::build_equation(&dispatch, &minimal_module()).unwrap_err();
    assert!(matches!(err, ConfigError::Equation(_)));
}

#[test]
fn unknown_yaml_tag_is_rejected_before_any_equation_builds() {
    let yaml = r#"
equations:
  - name: bogus
    dispatch:
      dimension: 1
      equation:
        type: NotARealEquation
    module:
      indicator:
        type: Zero
"#;
    let result = serde_yaml::from_str::<hv_app::RunConfig>(yaml);
    assert!(result.is_err());
}
