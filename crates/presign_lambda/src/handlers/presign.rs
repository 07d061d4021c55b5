use chrono::{DateTime, Utc};
use presign_core::config::{EnvironmentSettings, ResolvedConfig};
use presign_core::contract::{
    expiration_instant, parse_invocation_event, PresignedObject, ResponseEnvelope,
};
use presign_core::error::PresignError;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::parameter_store::{ParameterStore, ParameterStoreError};
use crate::adapters::url_signer::{
    GetObjectSigningRequest, SecretCredentials, SigningError, UrlSigner,
};

/// Runs one presign invocation and folds every outcome into the response
/// envelope. Never fails.
pub fn handle_presign_event(
    event: Value,
    settings: &EnvironmentSettings,
    invoked_at: DateTime<Utc>,
    store: &dyn ParameterStore,
    signer: &dyn UrlSigner,
) -> ResponseEnvelope {
    let outcome = presign_object(event, settings, invoked_at, store, signer);
    let response = ResponseEnvelope::from_outcome(&outcome);

    match &outcome {
        Ok(presigned) => info!(
            status_code = response.status_code,
            expires_at = %presigned.expires_at,
            "issued presigned url"
        ),
        Err(failure) if response.status_code >= 500 => error!(
            status_code = response.status_code,
            kind = failure.kind(),
            error = %failure,
            "presign request failed"
        ),
        Err(failure) => warn!(
            status_code = response.status_code,
            kind = failure.kind(),
            error = %failure,
            "presign request rejected"
        ),
    }

    response
}

pub fn presign_object(
    event: Value,
    settings: &EnvironmentSettings,
    invoked_at: DateTime<Utc>,
    store: &dyn ParameterStore,
    signer: &dyn UrlSigner,
) -> Result<PresignedObject, PresignError> {
    let request = parse_invocation_event(event)?;
    let config = settings.resolve(&request)?;
    let expires_at = expiration_instant(invoked_at, config.expires_in_secs).ok_or_else(|| {
        PresignError::InvalidExpiration {
            value: config.expires_in_secs.to_string(),
        }
    })?;

    info!(
        bucket = %config.bucket_name,
        object_key = %config.object_key,
        expires_in_secs = config.expires_in_secs,
        access_key_param = %config.access_key_param,
        secret_key_param = %config.secret_key_param,
        "resolved presign configuration"
    );

    let credentials = resolve_credentials(store, &config)?;
    let url = signer
        .presign_get(&GetObjectSigningRequest {
            bucket: &config.bucket_name,
            key: &config.object_key,
            credentials: &credentials,
            expires_in: config.expires_in(),
            signed_at: invoked_at.into(),
        })
        .map_err(|failure| match failure {
            SigningError::InvalidCredentials(message) => PresignError::Credentials(message),
            SigningError::Failed(message) => PresignError::Unexpected(message),
        })?;

    Ok(PresignedObject { url, expires_at })
}

fn resolve_credentials(
    store: &dyn ParameterStore,
    config: &ResolvedConfig,
) -> Result<SecretCredentials, PresignError> {
    let access_key_id = resolve_secret(store, &config.access_key_param)?;
    let secret_access_key = resolve_secret(store, &config.secret_key_param)?;
    Ok(SecretCredentials {
        access_key_id,
        secret_access_key,
    })
}

fn resolve_secret(store: &dyn ParameterStore, name: &str) -> Result<String, PresignError> {
    let value = store.get_decrypted(name).map_err(|failure| match failure {
        ParameterStoreError::NotFound { name } => PresignError::SecretNotFound { name },
        rejected @ ParameterStoreError::Credentials { .. } => {
            PresignError::Credentials(rejected.to_string())
        }
        ParameterStoreError::Failed { name, message } => {
            PresignError::SecretResolution { name, message }
        }
    })?;

    if value.trim().is_empty() {
        return Err(PresignError::Credentials(format!(
            "parameter {name} resolved to an empty value"
        )));
    }
    Ok(value)
}
