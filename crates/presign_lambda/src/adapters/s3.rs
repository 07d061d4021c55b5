use aws_config::SdkConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::{debug, warn};

use super::sdk_error::{display_chain, service_error_message};
use super::url_signer::{GetObjectSigningRequest, SecretCredentials, SigningError, UrlSigner};

pub const CREDENTIAL_PROVIDER_NAME: &str = "ssm-parameter-store";

/// S3 error codes that mean the signing key pair was rejected.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "ExpiredToken",
    "InvalidAccessKeyId",
    "InvalidToken",
    "SignatureDoesNotMatch",
];

/// Presigns S3 GET requests with a client built per call from the resolved
/// secrets. Region and endpoint come from `base_config`; its credential
/// chain is never consulted.
pub struct S3UrlSigner {
    base_config: SdkConfig,
}

impl S3UrlSigner {
    pub fn new(base_config: SdkConfig) -> Self {
        Self { base_config }
    }

    fn scoped_client(&self, credentials: &SecretCredentials) -> aws_sdk_s3::Client {
        let static_credentials = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            CREDENTIAL_PROVIDER_NAME,
        );
        let config = aws_sdk_s3::config::Builder::from(&self.base_config)
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(static_credentials)
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

impl UrlSigner for S3UrlSigner {
    fn presign_get(&self, request: &GetObjectSigningRequest<'_>) -> Result<String, SigningError> {
        if self.base_config.region().is_none() {
            return Err(SigningError::Failed(
                "no AWS region configured for S3 presigning".to_string(),
            ));
        }

        validate_credentials(request.credentials)?;

        let presigning_config = PresigningConfig::builder()
            .start_time(request.signed_at)
            .expires_in(request.expires_in)
            .build()
            .map_err(|error| {
                SigningError::Failed(format!("invalid presigning configuration: {error}"))
            })?;

        let client = self.scoped_client(request.credentials);
        let bucket = request.bucket.to_string();
        let key = request.key.to_string();
        debug!(bucket = request.bucket, object_key = request.key, "presigning GetObject");

        let presigned = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .presigned(presigning_config)
                    .await
            })
        })
        .map_err(|error| classify_presigning_error(&error))?;

        Ok(presigned.uri().to_string())
    }
}

fn validate_credentials(credentials: &SecretCredentials) -> Result<(), SigningError> {
    let usable = |value: &str| !value.is_empty() && !value.chars().any(char::is_whitespace);
    if !usable(&credentials.access_key_id) {
        return Err(SigningError::InvalidCredentials(
            "access key id is empty or contains whitespace".to_string(),
        ));
    }
    if !usable(&credentials.secret_access_key) {
        return Err(SigningError::InvalidCredentials(
            "secret access key is empty or contains whitespace".to_string(),
        ));
    }
    Ok(())
}

fn classify_presigning_error(error: &SdkError<GetObjectError>) -> SigningError {
    warn!(error = %DisplayErrorContext(error), "S3 presigning failed");

    match error {
        SdkError::ServiceError(context) => {
            let service_error = context.err();
            let message = service_error_message(service_error);
            if service_error
                .code()
                .is_some_and(|code| CREDENTIAL_ERROR_CODES.contains(&code))
            {
                SigningError::InvalidCredentials(message)
            } else {
                SigningError::Failed(format!("failed to generate presigned URL: {message}"))
            }
        }
        _ => SigningError::Failed(format!(
            "failed to generate presigned URL: {}",
            display_chain(error)
        )),
    }
}
