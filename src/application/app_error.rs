use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Caller is not the owner of the profile or domain in question.
    #[error("Unauthorized")]
    Unauthorized,

    /// Domain is already claimed by a different profile.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    /// The domain registry (Postgres) could not be reached or failed.
    #[error("Registry error: {0}")]
    Registry(String),

    /// Provider credentials (token / project id) are not configured.
    #[error("Edge provider configuration is missing")]
    ProviderConfigMissing,

    /// The provider rejected the domain (e.g. claimed by another project).
    /// The provider's raw diagnostic is kept for support/debugging.
    #[error("Edge provider conflict: {message}")]
    ProviderConflict {
        message: String,
        detail: serde_json::Value,
    },

    /// Network failure or 5xx from the provider API.
    #[error("Edge provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    Unauthorized,
    Conflict,
    InvalidInput,
    NotFound,
    RegistryError,
    ProviderConfigMissing,
    ProviderConflict,
    ProviderUnavailable,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RegistryError => "REGISTRY_ERROR",
            ErrorCode::ProviderConfigMissing => "PROVIDER_CONFIG_MISSING",
            ErrorCode::ProviderConflict => "PROVIDER_CONFLICT",
            ErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
