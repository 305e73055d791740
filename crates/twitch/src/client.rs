// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Twitch`] client: one handle over every platform operation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::chat;
use crate::config::TwitchConfig;
use crate::error::Error;
use crate::extension::claims::ClaimSigner;
use crate::extension::pubsub::BroadcastPublisher;
use crate::http::build_client;
use crate::oauth::{self, TokenPair};
use crate::streamer::StreamerCredential;
use crate::token::{self, TokenProvider};
use crate::users::{self, PlatformUser};

/// Shared client for the Twitch platform. Cheap to share behind an `Arc`.
pub struct Twitch {
    config: TwitchConfig,
    http: reqwest::Client,
    token: Arc<dyn TokenProvider>,
    publisher: BroadcastPublisher,
    cancel: CancellationToken,
}

impl Twitch {
    /// Build a client and acquire its app access token.
    ///
    /// The token is acquired exactly once; if that fails the client is not
    /// created.
    pub async fn connect(config: TwitchConfig) -> Result<Self, Error> {
        let signer = ClaimSigner::from_base64_secret(&config.extension_secret)?;
        let http = build_client(config.timeout())?;
        let token = token::acquire(&http, &config).await?;
        Ok(Self::assemble(config, http, Arc::new(token), signer))
    }

    /// Build a client around an existing token source.
    pub fn with_token_provider(
        config: TwitchConfig,
        token: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let signer = ClaimSigner::from_base64_secret(&config.extension_secret)?;
        let http = build_client(config.timeout())?;
        Ok(Self::assemble(config, http, token, signer))
    }

    fn assemble(
        config: TwitchConfig,
        http: reqwest::Client,
        token: Arc<dyn TokenProvider>,
        signer: ClaimSigner,
    ) -> Self {
        info!(
            client_id = %config.client_id,
            owner_user_id = %config.owner_user_id,
            "twitch client ready"
        );
        Self {
            config,
            http,
            token,
            publisher: BroadcastPublisher::new(signer),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &TwitchConfig {
        &self.config
    }

    /// Broadcast requests sent so far.
    pub fn publish_attempts(&self) -> u64 {
        self.publisher.attempts()
    }

    /// Abort in-flight secret verifications. They fail with a timeout.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub async fn get_user(&self, login: &str) -> Result<PlatformUser, Error> {
        users::get_user(&self.http, &self.config, self.token.as_ref(), login).await
    }

    /// Check that `secret` logs in to chat as `login`. Returns the login as
    /// the chat server spells it.
    pub async fn verify(&self, login: &str, secret: &str) -> Result<String, Error> {
        chat::verify::verify(&self.config.chat_url, login, secret, self.config.timeout(), &self.cancel)
            .await
    }

    /// Verify a streamer's secret and resolve their platform account.
    pub async fn authenticate_streamer(
        &self,
        login: &str,
        secret: &str,
    ) -> Result<PlatformUser, Error> {
        let cred = StreamerCredential::new(login, secret)?;
        let echoed = self.verify(cred.login(), cred.secret()).await?;
        cred.matches_echo(&echoed)?;
        let user = self.get_user(cred.login()).await?;
        debug!(login = %user.login, user_id = %user.id, "streamer authenticated");
        Ok(user)
    }

    /// Broadcast `message` to every viewer of `broadcaster_id`.
    pub async fn publish(&self, broadcaster_id: &str, message: &str) -> Result<(), Error> {
        self.publisher.publish(&self.http, &self.config, broadcaster_id, message).await
    }

    /// Broadcast a structured payload as compact JSON.
    pub async fn publish_json(
        &self,
        broadcaster_id: &str,
        message: &serde_json::Value,
    ) -> Result<(), Error> {
        let text = serde_json::to_string(message)?;
        self.publish(broadcaster_id, &text).await
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, Error> {
        oauth::exchange_code(&self.http, &self.config, code).await
    }

    pub async fn validate_token(&self, token: &str) -> Result<PlatformUser, Error> {
        oauth::validate_token(&self.http, &self.config, token).await
    }
}
