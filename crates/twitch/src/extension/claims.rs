// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived extension JWTs authorizing a PubSub broadcast.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How far in the future a broadcast claim expires.
pub const CLAIM_TTL: Duration = Duration::from_secs(10);

pub const EXTERNAL_ROLE: &str = "external";
pub const BROADCAST_TARGET: &str = "broadcast";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSubPermissions {
    pub send: Vec<String>,
}

/// Claim set for an external broadcast to one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastClaim {
    /// Expiry as epoch seconds.
    pub exp: u64,
    pub user_id: String,
    pub channel_id: String,
    pub role: String,
    pub pubsub_perms: PubSubPermissions,
}

impl BroadcastClaim {
    /// Claim for `broadcaster_id` expiring [`CLAIM_TTL`] after `now`.
    pub fn new(broadcaster_id: &str, now: SystemTime) -> Self {
        let exp = now.duration_since(UNIX_EPOCH).unwrap_or_default() + CLAIM_TTL;
        Self {
            exp: exp.as_secs(),
            user_id: broadcaster_id.to_owned(),
            channel_id: broadcaster_id.to_owned(),
            role: EXTERNAL_ROLE.to_owned(),
            pubsub_perms: PubSubPermissions { send: vec![BROADCAST_TARGET.to_owned()] },
        }
    }
}

/// HS256 signer keyed by the extension secret.
pub struct ClaimSigner {
    key: EncodingKey,
}

impl ClaimSigner {
    /// The extension secret is distributed base64-encoded.
    pub fn from_base64_secret(secret: &str) -> Result<Self, Error> {
        Ok(Self { key: EncodingKey::from_base64_secret(secret)? })
    }

    pub fn sign(&self, claim: &BroadcastClaim) -> Result<String, Error> {
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), claim, &self.key)?)
    }
}

impl fmt::Debug for ClaimSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
