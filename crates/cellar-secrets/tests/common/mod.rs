//! Common test infrastructure for cellar-secrets integration tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! - `constants`: tokens, identifiers and secret values
//! - `mock_server`: wiremock setup helpers for vault endpoints

#![allow(dead_code)]

pub mod constants;
pub mod mock_server;

pub use constants::*;
pub use mock_server::*;

use cellar_core::types::{NetworkConfig, RetryPolicy, RetryStrategy};
use cellar_secrets::{HttpClient, SecureString};
use std::net::TcpListener;
use wiremock::MockServer;

/// Retry policy with millisecond delays so tests stay fast
pub fn fast_retry_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        strategy: RetryStrategy::FixedDelay,
        backoff_multiplier: 1.0,
        initial_delay_ms: 1,
        max_delay_ms: 5,
    }
}

/// HTTP client pointed at the mock server
pub fn client_for(server: &MockServer, max_attempts: u32) -> HttpClient {
    client_for_url(&server.uri(), max_attempts)
}

/// HTTP client pointed at an arbitrary base URL
pub fn client_for_url(base_url: &str, max_attempts: u32) -> HttpClient {
    let network = NetworkConfig {
        http_timeout_secs: 5,
        ..NetworkConfig::default()
    };
    HttpClient::new(
        base_url,
        SecureString::from(TEST_TOKEN),
        &network,
        fast_retry_policy(max_attempts),
    )
    .expect("client should build")
}

/// Base URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
