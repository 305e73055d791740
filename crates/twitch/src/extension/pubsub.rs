// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extension PubSub broadcast to every viewer of a channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::TwitchConfig;
use crate::error::{Error, TransportError};
use crate::extension::claims::{BroadcastClaim, ClaimSigner, BROADCAST_TARGET};

/// Request body for `POST /extensions/pubsub`.
#[derive(Debug, Serialize)]
pub struct SendPubSubMessage<'a> {
    pub broadcaster_id: &'a str,
    pub message: &'a str,
    pub target: [&'a str; 1],
    pub is_global_broadcast: bool,
}

impl<'a> SendPubSubMessage<'a> {
    pub fn broadcast(broadcaster_id: &'a str, message: &'a str) -> Self {
        Self { broadcaster_id, message, target: [BROADCAST_TARGET], is_global_broadcast: false }
    }
}

/// Signs a fresh claim per call and posts the broadcast.
#[derive(Debug)]
pub struct BroadcastPublisher {
    signer: ClaimSigner,
    attempts: AtomicU64,
}

impl BroadcastPublisher {
    pub fn new(signer: ClaimSigner) -> Self {
        Self { signer, attempts: AtomicU64::new(0) }
    }

    /// Number of broadcast requests sent so far, successful or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub async fn publish(
        &self,
        client: &reqwest::Client,
        config: &TwitchConfig,
        broadcaster_id: &str,
        message: &str,
    ) -> Result<(), Error> {
        let jwt = self.signer.sign(&BroadcastClaim::new(broadcaster_id, SystemTime::now()))?;
        let body = SendPubSubMessage::broadcast(broadcaster_id, message);

        let sent = client
            .post(config.api_url("/extensions/pubsub"))
            .bearer_auth(jwt)
            .header("Client-ID", &config.client_id)
            .json(&body)
            .send()
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => {
                self.observe(broadcaster_id, -1, &e.to_string());
                return Err(e.into());
            }
        };

        let status = resp.status().as_u16();
        self.observe(broadcaster_id, i32::from(status), "");
        if status > 399 {
            let message = resp.text().await?;
            debug!(broadcaster_id, status, error_message = %message, "extension pubsub rejected");
            return Err(TransportError::Status { status, message }.into());
        }
        Ok(())
    }

    fn observe(&self, broadcaster_id: &str, status_code: i32, error: &str) {
        let attempts = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        info!(broadcaster_id, status_code, error, attempts, "extension pubsub attempt");
    }
}
