pub mod parameter_store;
pub mod s3;
pub mod sdk_error;
pub mod ssm;
pub mod url_signer;
