// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App access token: acquired once, read for every Helix call.
//!
//! There is no refresh path. A provider that refreshes must hold its value
//! behind a lock or an atomic swap, since readers take no synchronization.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TwitchConfig;
use crate::error::Error;
use crate::http::check_oauth_status;

/// Source of the bearer token attached to Helix requests.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> &str;
}

/// Single-assignment app access token.
pub struct AppToken {
    value: String,
    expires_in: u64,
}

impl AppToken {
    pub fn new(value: impl Into<String>, expires_in: u64) -> Self {
        Self { value: value.into(), expires_in }
    }

    /// Lifetime in seconds reported by the platform at acquisition.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }
}

impl TokenProvider for AppToken {
    fn access_token(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppToken").field("expires_in", &self.expires_in).finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct AppTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Request an app access token (client credentials grant, no scopes).
pub async fn acquire(client: &reqwest::Client, config: &TwitchConfig) -> Result<AppToken, Error> {
    debug!(client_id = %config.client_id, "requesting app access token");
    let resp = client
        .post(config.id_url("/oauth2/token"))
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", ""),
        ])
        .send()
        .await?;

    let resp = check_oauth_status(resp).await?;
    let token: AppTokenResponse = resp.json().await?;
    info!(expires_in = token.expires_in, "acquired app access token");
    Ok(AppToken::new(token.access_token, token.expires_in))
}
