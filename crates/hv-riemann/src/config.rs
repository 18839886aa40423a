//! Riemann-solver configuration.

use crate::newton::ScalarNewtonConfig;

#[derive(Clone, Copy, Debug)]
pub struct RiemannConfig {
    pub newton_max_iter: u32,
    pub newton_eps: f64,
}

impl Default for RiemannConfig {
    fn default() -> Self {
        Self {
            newton_max_iter: 100,
            newton_eps: 1e-10,
        }
    }
}

impl From<RiemannConfig> for ScalarNewtonConfig {
    fn from(config: RiemannConfig) -> Self {
        ScalarNewtonConfig {
            max_iterations: config.newton_max_iter,
            abs_tol: config.newton_eps,
        }
    }
}
