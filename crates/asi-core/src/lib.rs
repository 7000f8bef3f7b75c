//! # asi-core
//!
//! Foundation types shared by every ASI crate:
//!
//! - **Branded IDs**: `SessionId`, `RequestId` as newtypes for type safety
//! - **Domain types**: consultation, analysis and algorithm request/response schemas
//! - **Errors**: `ValidationError`, `ProducerError` via `thiserror`
//! - **Result producers**: the `ResultProducer` capability plus the random and fixed implementations
//! - **Platform state**: the process-wide metrics reported by the status endpoint
//! - **Logging**: `tracing` subscriber setup and a capture helper for tests

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod platform;
pub mod producer;
pub mod types;
