use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use presign_core::config::EnvironmentSettings;
use presign_core::contract::ResponseEnvelope;
use presign_lambda::adapters::s3::S3UrlSigner;
use presign_lambda::adapters::ssm::SsmParameterStore;
use presign_lambda::handlers::presign::handle_presign_event;
use presign_lambda::telemetry::init_tracing;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ResponseEnvelope, Error> {
    let invoked_at = Utc::now();
    let settings = EnvironmentSettings::from_env();
    tracing::info!(request_id = %event.context.request_id, "handling presign request");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = SsmParameterStore::new(aws_sdk_ssm::Client::new(&aws_config));
    let signer = S3UrlSigner::new(aws_config);

    Ok(handle_presign_event(
        event.payload,
        &settings,
        invoked_at,
        &store,
        &signer,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;
    lambda_runtime::run(service_fn(handle_request)).await
}
