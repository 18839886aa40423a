//! Configuration loading/validation errors.

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unknown {field}: {got} (accepted: {accepted})")]
    UnknownVariant {
        field: &'static str,
        got: String,
        accepted: &'static str,
    },

    #[error("equation/EOS construction error: {0}")]
    Equation(#[from] hv_equations::EquationError),

    #[error("mesh/offline-data error: {0}")]
    Offline(#[from] hv_offline::OfflineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
