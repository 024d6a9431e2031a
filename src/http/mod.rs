//! HTTP client module
//!
//! Provides the JSON client used to reach the control-plane state API.
//!
//! # Features
//!
//! - **Single attempt**: failures are classified and surfaced, never retried
//! - **Timeouts**: surfaced as `Error::Timeout`
//! - **Default headers**: e.g. an API key added by the deployment

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
