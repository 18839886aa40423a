use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("invalid mesh configuration: {what}")]
    InvalidMesh { what: &'static str },

    #[error("non-positive lumped mass at node {index}")]
    NonPositiveMass { index: usize },
}

pub type OfflineResult<T> = Result<T, OfflineError>;
