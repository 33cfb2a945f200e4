// Typed errors for the interface capability and the sampler

use thiserror::Error;

/// Failure of an OS interface query. Never fatal to the sampler.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("interface {0} is no longer present")]
    NotFound(String),
    #[error("interface query failed: {0}")]
    Query(String),
    #[error("interface task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("update interval must be > 0 ms")]
    InvalidInterval,
}
