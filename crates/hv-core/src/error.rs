use thiserror::Error;

/// Root error type for configuration and programmer-invariant failures.
///
/// Transient invariant-domain violations are *not* represented here: those
/// are signaled by `hv_step::StepError::Restart`, a distinguished sentinel
/// the caller must decide how to handle rather than a propagated `Err`.
#[derive(Error, Debug)]
pub enum HvError {
    #[error("non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("unknown {field}: got {got:?}, expected one of {accepted:?}")]
    UnknownVariant {
        field: &'static str,
        got: String,
        accepted: &'static [&'static str],
    },
}

pub type HvResult<T> = Result<T, HvError>;

pub fn ensure_finite(v: f64, what: &'static str) -> HvResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HvError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("non-finite"));
    }
}
