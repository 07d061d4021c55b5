//! AWS-oriented adapters and the request handler for presigned URL issuance.
//!
//! This crate owns runtime integration details (Lambda handler, parameter
//! store and S3 presigning adapters, log setup). Contract, configuration and
//! error primitives live in `presign_core`.

pub mod adapters;
pub mod handlers;
pub mod telemetry;
