use thiserror::Error;

/// Every way a presign invocation can fail. Each variant maps to exactly one
/// response status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PresignError {
    #[error("Environment variables 'BUCKET_NAME' or 'OBJECT_KEY' are missing.")]
    MissingTargetConfig,

    #[error(
        "Environment variable 'PRESIGNED_URL_EXPIRATION' must be a non-negative integer number of seconds no greater than 604800, got '{value}'."
    )]
    InvalidExpiration { value: String },

    #[error("Invalid request payload: {0}")]
    InvalidRequest(String),

    #[error("Parameter store paths for access key and secret key are not set.")]
    MissingCredentialPaths,

    #[error("Error retrieving parameter {name}: {message}")]
    SecretResolution { name: String, message: String },

    #[error("Parameter not found: {name}")]
    SecretNotFound { name: String },

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PresignError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingTargetConfig | Self::InvalidExpiration { .. } | Self::InvalidRequest(_) => {
                400
            }
            Self::SecretResolution { .. } | Self::SecretNotFound { .. } => 404,
            Self::MissingCredentialPaths | Self::Credentials(_) | Self::Unexpected(_) => 500,
        }
    }

    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTargetConfig => "missing_target_config",
            Self::InvalidExpiration { .. } => "invalid_expiration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::MissingCredentialPaths => "missing_credential_paths",
            Self::SecretResolution { .. } => "secret_resolution",
            Self::SecretNotFound { .. } => "secret_not_found",
            Self::Credentials(_) => "credentials",
            Self::Unexpected(_) => "unexpected",
        }
    }
}
