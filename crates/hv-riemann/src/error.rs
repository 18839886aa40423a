use thiserror::Error;

/// Non-fatal Riemann-solve failures : the caller
/// falls back to the two-rarefaction bound rather than propagating.
#[derive(Error, Debug)]
pub enum RiemannError {
    #[error("bracketed Newton failed to converge after {iterations} iterations, residual = {residual}")]
    NotConverged { iterations: u32, residual: f64 },

    #[error("initial bracket [{lo}, {hi}] does not contain a sign change")]
    InvalidBracket { lo: f64, hi: f64 },
}

pub type RiemannResultT<T> = Result<T, RiemannError>;
