use std::time::Duration;

use crate::contract::{PresignRequest, DEFAULT_EXPIRATION_SECS, MAX_EXPIRATION_SECS};
use crate::error::PresignError;

pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";
pub const OBJECT_KEY_VAR: &str = "OBJECT_KEY";
pub const EXPIRATION_VAR: &str = "PRESIGNED_URL_EXPIRATION";
pub const ACCESS_KEY_PARAM_VAR: &str = "AWS_ACCESS_KEY_PARAM";
pub const SECRET_KEY_PARAM_VAR: &str = "AWS_SECRET_KEY_PARAM";

/// Raw configuration captured from the process environment at invocation
/// start. Unset and empty variables are both recorded as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub bucket_name: Option<String>,
    pub object_key: Option<String>,
    pub expiration: Option<String>,
    pub access_key_param: Option<String>,
    pub secret_key_param: Option<String>,
}

/// Fully validated configuration for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub bucket_name: String,
    pub object_key: String,
    pub expires_in_secs: u64,
    pub access_key_param: String,
    pub secret_key_param: String,
}

impl EnvironmentSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            bucket_name: read(BUCKET_NAME_VAR),
            object_key: read(OBJECT_KEY_VAR),
            expiration: read(EXPIRATION_VAR),
            access_key_param: read(ACCESS_KEY_PARAM_VAR),
            secret_key_param: read(SECRET_KEY_PARAM_VAR),
        }
    }

    /// Applies the request override and validates, in order: target
    /// location, expiration, then parameter paths.
    pub fn resolve(&self, request: &PresignRequest) -> Result<ResolvedConfig, PresignError> {
        let object_key = request
            .object_key_override()
            .map(str::to_string)
            .or_else(|| self.object_key.clone());

        let (Some(bucket_name), Some(object_key)) = (self.bucket_name.clone(), object_key) else {
            return Err(PresignError::MissingTargetConfig);
        };

        let expires_in_secs = parse_expiration(self.expiration.as_deref())?;

        let (Some(access_key_param), Some(secret_key_param)) =
            (self.access_key_param.clone(), self.secret_key_param.clone())
        else {
            return Err(PresignError::MissingCredentialPaths);
        };

        Ok(ResolvedConfig {
            bucket_name,
            object_key,
            expires_in_secs,
            access_key_param,
            secret_key_param,
        })
    }
}

impl ResolvedConfig {
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in_secs)
    }
}

pub fn parse_expiration(raw: Option<&str>) -> Result<u64, PresignError> {
    match raw {
        None => Ok(DEFAULT_EXPIRATION_SECS),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|seconds| *seconds <= MAX_EXPIRATION_SECS)
            .ok_or_else(|| PresignError::InvalidExpiration {
                value: value.to_string(),
            }),
    }
}
