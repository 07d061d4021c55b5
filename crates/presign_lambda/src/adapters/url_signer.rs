use std::fmt;
use std::time::{Duration, SystemTime};

use thiserror::Error;

/// Access key pair read from the parameter store. Only lives for one
/// invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for SecretCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GetObjectSigningRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub credentials: &'a SecretCredentials,
    pub expires_in: Duration,
    pub signed_at: SystemTime,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Failed(String),
}

/// Produces a bearer URL for a single GET on one object, signed only with
/// the supplied credentials.
pub trait UrlSigner {
    fn presign_get(&self, request: &GetObjectSigningRequest<'_>) -> Result<String, SigningError>;
}
