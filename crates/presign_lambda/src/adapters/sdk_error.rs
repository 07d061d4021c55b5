//! Rendering of AWS SDK failures into text that is safe to hand back to the
//! caller. `DisplayErrorContext` appends the `Debug` of the whole `SdkError`,
//! raw HTTP response included, so it is only used for log fields.

use std::error::Error;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// `code: message` from the service error metadata, falling back to the
/// error's display chain when the service sent neither.
pub fn service_error_message<E>(error: &E) -> String
where
    E: ProvideErrorMetadata + Error,
{
    match (error.code(), error.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => display_chain(error),
    }
}

/// Joins the `Display` of an error and each of its sources.
pub fn display_chain(error: &dyn Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::get_object::GetObjectError;

    use super::*;

    #[derive(Debug)]
    struct Layer {
        text: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.text)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|layer| layer as &(dyn Error + 'static))
        }
    }

    #[test]
    fn display_chain_joins_sources_without_debug_output() {
        let error = Layer {
            text: "dispatch failure",
            source: Some(Box::new(Layer {
                text: "io error",
                source: Some(Box::new(Layer {
                    text: "connection refused",
                    source: None,
                })),
            })),
        };

        assert_eq!(
            display_chain(&error),
            "dispatch failure: io error: connection refused"
        );
    }

    #[test]
    fn service_message_prefers_code_and_message() {
        let error = GetObjectError::generic(
            ErrorMetadata::builder()
                .code("SignatureDoesNotMatch")
                .message("The request signature we calculated does not match")
                .build(),
        );

        assert_eq!(
            service_error_message(&error),
            "SignatureDoesNotMatch: The request signature we calculated does not match"
        );
    }

    #[test]
    fn service_message_uses_code_alone_when_message_missing() {
        let error =
            GetObjectError::generic(ErrorMetadata::builder().code("ThrottlingException").build());
        assert_eq!(service_error_message(&error), "ThrottlingException");
    }
}
