use thiserror::Error;

/// Failure kinds surfaced by the registry core and the access gate.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed or missing required input
    #[error("{0}")]
    Validation(String),

    /// No entry with the given id (single-record get only)
    #[error("{0}")]
    NotFound(String),

    /// Any underlying persistence failure
    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    /// Rejected by the access gate
    #[error("unauthorized")]
    Unauthorized,
}

pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(id: &str) -> Self {
        Self::NotFound(format!("Image not found: {}", id))
    }
}
