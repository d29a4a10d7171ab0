//! HTTP API client used for test data setup and API-level checks.
//!
//! Wraps `reqwest` with default headers, bearer auth, expected-status
//! assertions and a generic business-success check on JSON bodies.

mod client;
mod error;

pub use client::{
    ApiClient, DEFAULT_CONTENT_TYPE, RequestOptions, check_business_success, handle_response,
};
pub use error::ApiError;
