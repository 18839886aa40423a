use thiserror::Error;

/// Fatal, startup-time configuration errors :
/// unknown EOS, unknown equation, dimension out of range.
#[derive(Error, Debug)]
pub enum EquationError {
    #[error("unknown equation of state {got:?}, expected one of {accepted:?}")]
    UnknownEos {
        got: String,
        accepted: &'static [&'static str],
    },

    #[error("dimension {got} out of range, expected one of {accepted:?}")]
    DimensionOutOfRange { got: usize, accepted: &'static [usize] },

    #[error("{what} is not implemented")]
    Unimplemented { what: &'static str },
}

pub type EquationResult<T> = Result<T, EquationError>;
