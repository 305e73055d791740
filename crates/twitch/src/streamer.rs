// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streamer credentials as supplied by a caller. Never stored or logged.

use std::fmt;

use crate::error::Error;

/// Login and chat secret claimed by a streamer.
#[derive(Clone)]
pub struct StreamerCredential {
    login: String,
    secret: String,
}

impl StreamerCredential {
    /// Lowercase the login and reject blank inputs before any network call.
    pub fn new(login: &str, secret: &str) -> Result<Self, Error> {
        if login.is_empty() || secret.is_empty() {
            return Err(Error::Auth("missing login or secret".to_owned()));
        }
        Ok(Self { login: login.to_lowercase(), secret: secret.to_owned() })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The chat server echoes the login in its own casing; it must still name
    /// the account we asked for.
    pub fn matches_echo(&self, echoed: &str) -> Result<(), Error> {
        if echoed.to_lowercase() == self.login {
            Ok(())
        } else {
            Err(Error::Auth("unauthorized".to_owned()))
        }
    }
}

impl fmt::Debug for StreamerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamerCredential").field("login", &self.login).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
