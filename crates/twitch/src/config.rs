// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.twitch.tv/helix";
pub const DEFAULT_ID_BASE: &str = "https://id.twitch.tv";
pub const DEFAULT_CHAT_URL: &str = "ws://irc-ws.chat.twitch.tv:80/";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:49000";

/// Credentials and endpoints for the Twitch client.
#[derive(Clone, clap::Args)]
pub struct TwitchConfig {
    /// Application client ID.
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    pub client_id: String,

    /// Application client secret.
    #[arg(long, env = "TWITCH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// User ID of the extension owner.
    #[arg(long, env = "TWITCH_OWNER_USER_ID")]
    pub owner_user_id: String,

    /// Base64 extension secret used to sign broadcast claims.
    #[arg(long, env = "TWITCH_EXTENSION_SECRET", hide_env_values = true)]
    pub extension_secret: String,

    /// Per-call timeout in milliseconds.
    #[arg(long, default_value_t = 5000, env = "TWITCH_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Redirect URI registered for the authorization code flow.
    #[arg(long, default_value = DEFAULT_REDIRECT_URI, env = "TWITCH_REDIRECT_URI")]
    pub redirect_uri: String,

    /// Helix REST base URL.
    #[arg(long, hide = true, default_value = DEFAULT_API_BASE, env = "TWITCH_API_BASE")]
    pub api_base: String,

    /// OAuth (id) base URL.
    #[arg(long, hide = true, default_value = DEFAULT_ID_BASE, env = "TWITCH_ID_BASE")]
    pub id_base: String,

    /// Chat WebSocket URL used for secret verification.
    #[arg(long, hide = true, default_value = DEFAULT_CHAT_URL, env = "TWITCH_CHAT_URL")]
    pub chat_url: String,
}

impl TwitchConfig {
    /// Config pointed at the production endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        owner_user_id: impl Into<String>,
        extension_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            owner_user_id: owner_user_id.into(),
            extension_secret: extension_secret.into(),
            timeout_ms: 5000,
            redirect_uri: DEFAULT_REDIRECT_URI.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            id_base: DEFAULT_ID_BASE.to_owned(),
            chat_url: DEFAULT_CHAT_URL.to_owned(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.client_id.is_empty() {
            anyhow::bail!("--client-id must not be empty");
        }
        if self.client_secret.is_empty() {
            anyhow::bail!("--client-secret must not be empty");
        }
        if self.extension_secret.is_empty() {
            anyhow::bail!("--extension-secret must not be empty");
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("--timeout-ms must be greater than zero");
        }
        Ok(())
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    pub(crate) fn id_url(&self, path: &str) -> String {
        format!("{}{}", self.id_base.trim_end_matches('/'), path)
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("owner_user_id", &self.owner_user_id)
            .field("timeout_ms", &self.timeout_ms)
            .field("redirect_uri", &self.redirect_uri)
            .field("api_base", &self.api_base)
            .field("id_base", &self.id_base)
            .field("chat_url", &self.chat_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
