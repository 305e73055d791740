// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The platform rejected the credential or token.
    Auth,
    /// The chat handshake did not settle before its deadline.
    Timeout,
    /// Network failure, bad status, or an unreadable response.
    Transport,
}

impl ErrorKind {
    /// Status the route layer should answer with for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Auth => 401,
            Self::Timeout => 504,
            Self::Transport => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH",
            Self::Timeout => "TIMEOUT",
            Self::Transport => "TRANSPORT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by every platform operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Auth(String),
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Underlying cause of a [`ErrorKind::Transport`] failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Sign(#[from] jsonwebtoken::errors::Error),
    /// The platform answered with an error status. `message` is its own text.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("no such user: {login}")]
    NoSuchUser { login: String },
    #[error("unknown error")]
    Unknown,
    #[error("chat connection closed before the handshake settled")]
    Closed,
    #[error("chat connection did not close in time")]
    CloseTimedOut,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.into())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(e.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport(e.into())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Transport(e.into())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
