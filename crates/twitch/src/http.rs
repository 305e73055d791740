// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reqwest plumbing shared by the REST operations.

use std::sync::Once;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{Error, TransportError};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the HTTP client every REST call goes through.
pub fn build_client(timeout: Duration) -> Result<Client, Error> {
    ensure_crypto();
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}

/// Classify an id-endpoint response: 4xx is an auth failure carrying the
/// body, 5xx is an opaque server error.
pub async fn check_oauth_status(resp: Response) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_client_error() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Auth(body));
    }
    if status.is_server_error() {
        return Err(TransportError::Unknown.into());
    }
    Ok(resp)
}

/// Helix error envelope: `{"error":"Unauthorized","status":401,"message":"..."}`.
#[derive(Debug, Deserialize)]
struct HelixError {
    #[serde(default)]
    message: String,
}

/// Turn a Helix error status into a transport error carrying the platform's
/// message, falling back to the raw body.
pub async fn helix_status_error(resp: Response) -> Error {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    TransportError::Status { status, message: helix_message(&body) }.into()
}

fn helix_message(body: &str) -> String {
    match serde_json::from_str::<HelixError>(body) {
        Ok(e) if !e.message.is_empty() => e.message,
        _ => body.to_owned(),
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
