//! Shared presign domain primitives.
//!
//! This crate owns configuration resolution, the invocation/response contract
//! and the error taxonomy. It intentionally excludes AWS SDK and Lambda
//! runtime concerns so the handler logic can be exercised without either.

pub mod config;
pub mod contract;
pub mod error;
