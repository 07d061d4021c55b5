use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::operation::get_parameter::{GetParameterError, GetParameterOutput};
use tracing::{debug, warn};

use super::parameter_store::{is_credential_error_code, ParameterStore, ParameterStoreError};
use super::sdk_error::{display_chain, service_error_message};

/// SSM Parameter Store adapter. Every read asks for decryption so
/// `SecureString` parameters come back as plaintext.
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

impl ParameterStore for SsmParameterStore {
    fn get_decrypted(&self, name: &str) -> Result<String, ParameterStoreError> {
        let client = self.client.clone();
        let parameter_name = name.to_string();
        debug!(parameter = name, "reading parameter with decryption");

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_parameter()
                    .name(parameter_name)
                    .with_decryption(true)
                    .send()
                    .await
            })
        })
        .map_err(|error| classify_get_parameter_error(name, &error))?;

        parameter_value(name, &output)
    }
}

fn parameter_value(name: &str, output: &GetParameterOutput) -> Result<String, ParameterStoreError> {
    output
        .parameter()
        .and_then(|parameter| parameter.value())
        .map(str::to_string)
        .ok_or_else(|| ParameterStoreError::NotFound {
            name: name.to_string(),
        })
}

fn classify_get_parameter_error(
    name: &str,
    error: &SdkError<GetParameterError>,
) -> ParameterStoreError {
    warn!(
        parameter = name,
        error = %DisplayErrorContext(error),
        "parameter store request failed"
    );

    let Some(service_error) = error.as_service_error() else {
        return ParameterStoreError::Failed {
            name: name.to_string(),
            message: display_chain(error),
        };
    };

    match service_error {
        GetParameterError::ParameterNotFound(_) => ParameterStoreError::NotFound {
            name: name.to_string(),
        },
        _ if service_error.code().is_some_and(is_credential_error_code) => {
            ParameterStoreError::Credentials {
                name: name.to_string(),
                message: service_error_message(service_error),
            }
        }
        _ => ParameterStoreError::Failed {
            name: name.to_string(),
            message: service_error_message(service_error),
        },
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_ssm::error::ErrorMetadata;
    use aws_sdk_ssm::types::error::ParameterNotFound;
    use aws_sdk_ssm::types::Parameter;
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;

    use super::*;

    fn service_failure(error: GetParameterError, status: u16) -> SdkError<GetParameterError> {
        SdkError::service_error(
            error,
            Response::new(
                StatusCode::try_from(status).expect("valid status code"),
                SdkBody::empty(),
            ),
        )
    }

    fn coded(code: &str, message: &str) -> GetParameterError {
        GetParameterError::generic(ErrorMetadata::builder().code(code).message(message).build())
    }

    #[test]
    fn parameter_not_found_is_not_found() {
        let error = service_failure(
            GetParameterError::ParameterNotFound(ParameterNotFound::builder().build()),
            400,
        );

        assert_eq!(
            classify_get_parameter_error("/p/ak", &error),
            ParameterStoreError::NotFound {
                name: "/p/ak".to_string()
            }
        );
    }

    #[test]
    fn authentication_rejection_is_a_credential_error() {
        let error = service_failure(
            coded(
                "UnrecognizedClientException",
                "The security token included in the request is invalid.",
            ),
            400,
        );

        assert_eq!(
            classify_get_parameter_error("/p/ak", &error),
            ParameterStoreError::Credentials {
                name: "/p/ak".to_string(),
                message: "UnrecognizedClientException: The security token included in the request is invalid."
                    .to_string(),
            }
        );
    }

    #[test]
    fn other_service_errors_are_generic_failures_with_readable_text() {
        let error = service_failure(coded("ThrottlingException", "Rate exceeded"), 400);

        let classified = classify_get_parameter_error("/p/ak", &error);

        assert_eq!(
            classified,
            ParameterStoreError::Failed {
                name: "/p/ak".to_string(),
                message: "ThrottlingException: Rate exceeded".to_string(),
            }
        );
        let rendered = classified.to_string();
        assert!(!rendered.contains("raw: Response"));
        assert!(!rendered.contains("SdkBody"));
    }

    #[test]
    fn transport_failures_keep_only_the_display_chain() {
        let error: SdkError<GetParameterError> =
            SdkError::construction_failure("no region configured");

        let ParameterStoreError::Failed { name, message } =
            classify_get_parameter_error("/p/sk", &error)
        else {
            panic!("construction failure should be a generic failure");
        };

        assert_eq!(name, "/p/sk");
        assert!(message.contains("no region configured"));
        assert!(!message.contains("ConstructionFailure"));
    }

    #[test]
    fn extracts_decrypted_value() {
        let output = GetParameterOutput::builder()
            .parameter(
                Parameter::builder()
                    .name("/p/ak")
                    .value("AKIAEXAMPLE")
                    .build(),
            )
            .build();

        assert_eq!(
            parameter_value("/p/ak", &output),
            Ok("AKIAEXAMPLE".to_string())
        );
    }

    #[test]
    fn missing_parameter_or_value_is_not_found() {
        let empty_output = GetParameterOutput::builder().build();
        let valueless_output = GetParameterOutput::builder()
            .parameter(Parameter::builder().name("/p/sk").build())
            .build();

        for output in [empty_output, valueless_output] {
            assert_eq!(
                parameter_value("/p/sk", &output),
                Err(ParameterStoreError::NotFound {
                    name: "/p/sk".to_string()
                })
            );
        }
    }
}
