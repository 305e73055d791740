// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User OAuth: authorization code exchange and token validation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TwitchConfig;
use crate::error::Error;
use crate::http::check_oauth_status;
use crate::users::PlatformUser;

/// Access/refresh pair returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Body of `GET /oauth2/validate`.
#[derive(Debug, Clone, Deserialize)]
struct ValidateResponse {
    login: String,
    user_id: String,
}

impl From<ValidateResponse> for PlatformUser {
    fn from(v: ValidateResponse) -> Self {
        Self { id: v.user_id, login: v.login }
    }
}

/// Exchange an authorization code for a user token pair.
pub async fn exchange_code(
    client: &reqwest::Client,
    config: &TwitchConfig,
    code: &str,
) -> Result<TokenPair, Error> {
    let resp = client
        .post(config.id_url("/oauth2/token"))
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    debug!(status = resp.status().as_u16(), "oauth code exchange");
    let resp = check_oauth_status(resp).await?;
    Ok(resp.json().await?)
}

/// Resolve a user token to the account it belongs to.
pub async fn validate_token(
    client: &reqwest::Client,
    config: &TwitchConfig,
    token: &str,
) -> Result<PlatformUser, Error> {
    let resp = client
        .get(config.id_url("/oauth2/validate"))
        .header("Authorization", format!("OAuth {token}"))
        .send()
        .await?;

    debug!(status = resp.status().as_u16(), "oauth token validation");
    let resp = check_oauth_status(resp).await?;
    let validated: ValidateResponse = resp.json().await?;
    Ok(validated.into())
}

#[cfg(test)]
#[path = "oauth_tests.rs"]
mod tests;
