use thiserror::Error;

/// Error codes with which the parameter store rejects the caller's own
/// authentication rather than the lookup itself.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "AccessDeniedException",
    "ExpiredTokenException",
    "IncompleteSignature",
    "InvalidClientTokenId",
    "InvalidSignatureException",
    "MissingAuthenticationToken",
    "UnrecognizedClientException",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParameterStoreError {
    #[error("parameter '{name}' was not found")]
    NotFound { name: String },

    #[error("parameter store rejected credentials while reading '{name}': {message}")]
    Credentials { name: String, message: String },

    #[error("failed to read parameter '{name}': {message}")]
    Failed { name: String, message: String },
}

/// Key/value store holding the signing secrets. Values are always returned
/// decrypted.
pub trait ParameterStore {
    fn get_decrypted(&self, name: &str) -> Result<String, ParameterStoreError>;
}

pub fn is_credential_error_code(code: &str) -> bool {
    CREDENTIAL_ERROR_CODES.contains(&code)
}
