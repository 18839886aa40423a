//! `hv-step`'s fatal error taxonomy.
//! Transient invariant-domain violations are *not* an `Err` here — they
//! surface as `StepOutcome::Restart`, a typed sentinel the caller decides
//! how to handle.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepError {
    #[error("non-positive lumped mass at node {index}")]
    NonPositiveMass { index: usize },

    #[error("unknown {field}: got {got:?}, expected one of {accepted:?}")]
    UnknownVariant {
        field: &'static str,
        got: String,
        accepted: &'static [&'static str],
    },

    #[error(transparent)]
    Core(#[from] hv_core::HvError),
}

pub type StepResult<T> = Result<T, StepError>;
