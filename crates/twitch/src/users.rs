// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helix user lookup.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TwitchConfig;
use crate::error::{Error, TransportError};
use crate::http::helix_status_error;
use crate::token::TokenProvider;

/// A platform account as far as this service cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: String,
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    data: Vec<PlatformUser>,
}

/// Resolve a single login. Only the first returned user is used.
pub async fn get_user(
    client: &reqwest::Client,
    config: &TwitchConfig,
    token: &dyn TokenProvider,
    login: &str,
) -> Result<PlatformUser, Error> {
    let resp = client
        .get(config.api_url("/users"))
        .query(&[("login", login)])
        .bearer_auth(token.access_token())
        .header("Client-Id", &config.client_id)
        .send()
        .await?;

    let status = resp.status();
    debug!(login, status = status.as_u16(), "helix get users");
    if status.as_u16() > 399 {
        return Err(helix_status_error(resp).await);
    }

    let users: UsersResponse = resp.json().await?;
    debug!(login, users_returned = users.data.len(), "helix get users decoded");
    users
        .data
        .into_iter()
        .next()
        .ok_or_else(|| TransportError::NoSuchUser { login: login.to_owned() }.into())
}
