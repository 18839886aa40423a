//! hv-app: YAML project configuration and the equation registry that turns
//! it into running `StepController`s . No physics of
//! its own -- only the schema/validate/dispatch layer the CLI drives.

pub mod config;
pub mod error;
pub mod registry;

pub use config::{
    EosConfig, EquationDispatchConfig, EquationInstanceConfig, EquationKind, FieldSelectorConfig,
    HyperbolicModuleConfig, IndicatorConfig, LimiterConfig, RiemannSolverConfig, RunConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use registry::{build_equation, AnyEos, AnyIndicator, AnyRiemannSolver, ErasedEquation};
