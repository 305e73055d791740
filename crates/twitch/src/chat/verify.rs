// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prove a streamer controls a chat secret by logging in with it.
//!
//! A reader task consumes frames and settles one outcome; the caller races
//! that outcome against the deadline and the client's cancellation token.
//! Whichever fires first decides. The reader is told to stop afterwards and
//! whatever it would have reported is dropped.

use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::chat::parse::{parse_frame, Reply};
use crate::error::{Error, TransportError};

/// Upper bound on sending the close frame once the outcome is known. The
/// verification deadline still caps it.
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Verification progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Connecting,
    Handshaking,
    Verified,
    Rejected,
    TimedOut,
    Failed,
}

impl HandshakeState {
    fn settled(result: &Result<String, Error>) -> Self {
        match result {
            Ok(_) => Self::Verified,
            Err(Error::Auth(_)) => Self::Rejected,
            Err(Error::Timeout(_)) => Self::TimedOut,
            Err(Error::Transport(_)) => Self::Failed,
        }
    }
}

/// Log in to chat as `login` with `secret` and return the login the server
/// echoes back (its canonical casing).
pub async fn verify(
    chat_url: &str,
    login: &str,
    secret: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, Error> {
    let deadline = Instant::now() + timeout;
    debug!(login, state = ?HandshakeState::Connecting, "chat verification");

    let connected = tokio::select! {
        res = tokio::time::timeout_at(deadline, tokio_tungstenite::connect_async(chat_url)) => {
            res.map_err(|_| Error::Timeout(timeout))
        }
        _ = cancel.cancelled() => Err(Error::Timeout(timeout)),
    };
    let (ws, _handshake_response) = match connected {
        Ok(Ok(conn)) => conn,
        Ok(Err(e)) => {
            debug!(login, err = %e, state = ?HandshakeState::Failed, "chat connect failed");
            return Err(e.into());
        }
        Err(e) => {
            debug!(login, state = ?HandshakeState::TimedOut, "chat connect timed out");
            return Err(e);
        }
    };

    let (mut sink, stream) = ws.split();
    let stop_reader = cancel.child_token();
    let (outcome_tx, outcome_rx) = oneshot::channel();
    tokio::spawn(read_until_settled(stream, outcome_tx, stop_reader.clone()));
    let _stop_reader = stop_reader.drop_guard();

    debug!(login, state = ?HandshakeState::Handshaking, "chat verification");
    let result = tokio::select! {
        res = tokio::time::timeout_at(deadline, handshake(&mut sink, login, secret, outcome_rx)) => {
            res.unwrap_or(Err(Error::Timeout(timeout)))
        }
        _ = cancel.cancelled() => Err(Error::Timeout(timeout)),
    };

    let close_by = deadline.min(Instant::now() + CLOSE_TIMEOUT);
    let result = release(&mut sink, result, close_by).await;
    debug!(login, state = ?HandshakeState::settled(&result), "chat verification settled");
    result
}

/// Send PASS then NICK and wait for the reader to settle.
async fn handshake<W>(
    sink: &mut W,
    login: &str,
    secret: &str,
    outcome: oneshot::Receiver<Result<String, Error>>,
) -> Result<String, Error>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    sink.send(Message::text(format!("PASS oauth:{secret}"))).await?;
    sink.send(Message::text(format!("NICK {login}"))).await?;
    outcome.await.unwrap_or(Err(TransportError::Closed.into()))
}

/// Close the write half, giving up at `close_by`. A close that fails or does
/// not finish only replaces a success. An abandoned close still releases the
/// socket once both halves are dropped.
async fn release<W>(
    sink: &mut W,
    result: Result<String, Error>,
    close_by: Instant,
) -> Result<String, Error>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let closed = match tokio::time::timeout_at(close_by, sink.close()).await {
        Ok(closed) => closed.map_err(Error::from),
        Err(_) => Err(TransportError::CloseTimedOut.into()),
    };
    match (result, closed) {
        (Ok(_), Err(e)) => Err(e),
        (result, _) => result,
    }
}

/// Pull frames until one decides the outcome, the stream fails, or `stop`
/// fires. A dropped receiver means the caller already moved on.
async fn read_until_settled<R>(
    mut stream: R,
    outcome: oneshot::Sender<Result<String, Error>>,
    stop: CancellationToken,
) where
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let settled = loop {
        let msg = tokio::select! {
            _ = stop.cancelled() => return,
            msg = stream.next() => msg,
        };
        let decided = match msg {
            Some(Ok(Message::Text(text))) => decide(text.as_str()),
            Some(Ok(Message::Binary(data))) => std::str::from_utf8(&data).ok().and_then(decide),
            Some(Ok(Message::Close(_))) | None => Some(Err(TransportError::Closed.into())),
            Some(Ok(_)) => None, // ping/pong
            Some(Err(e)) => Some(Err(e.into())),
        };
        if let Some(settled) = decided {
            break settled;
        }
    };
    let _ = outcome.send(settled);
}

fn decide(frame: &str) -> Option<Result<String, Error>> {
    match parse_frame(frame)? {
        Reply::Welcome(login) => Some(Ok(login)),
        Reply::Notice(line) => Some(Err(Error::Auth(format!("failed to authenticate: {line}")))),
    }
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
