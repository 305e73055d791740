// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fakes of the Twitch endpoints.
//!
//! REST endpoints are an axum router on `127.0.0.1:0`; the chat endpoint is a
//! raw tokio-tungstenite accept loop so tests can script frames and observe
//! when the client hangs up.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use futures_util::{Sink, SinkExt, StreamExt};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;

use relics_twitch::extension::claims::BroadcastClaim;
use relics_twitch::token::AppToken;
use relics_twitch::{Twitch, TwitchConfig};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const APP_TOKEN: &str = "app-token";
// base64("extension-secret")
pub const EXTENSION_SECRET: &str = "ZXh0ZW5zaW9uLXNlY3JldA==";

/// Spawn an axum router on an ephemeral port.
pub async fn spawn_http(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    Ok(addr)
}

pub fn test_config(http: SocketAddr, chat_url: &str, timeout: Duration) -> TwitchConfig {
    let mut config = TwitchConfig::new(CLIENT_ID, CLIENT_SECRET, "owner-1", EXTENSION_SECRET);
    config.api_base = format!("http://{http}/helix");
    config.id_base = format!("http://{http}");
    config.chat_url = chat_url.to_owned();
    config.timeout_ms = timeout.as_millis() as u64;
    config
}

/// Client with a pre-seeded app token (no token request).
pub fn test_client(config: TwitchConfig) -> anyhow::Result<Twitch> {
    Ok(Twitch::with_token_provider(config, Arc::new(AppToken::new(APP_TOKEN, 3600)))?)
}

// -- REST fake ----------------------------------------------------------------

/// A broadcast request as the fake saw it.
#[derive(Debug, Clone)]
pub struct RecordedPublish {
    pub client_id: Option<String>,
    pub claims: BroadcastClaim,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct FakeTwitch {
    pub publishes: Arc<Mutex<Vec<RecordedPublish>>>,
    pub token_requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeTwitch {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/oauth2/token", post(token))
            .route("/oauth2/validate", get(validate))
            .route("/helix/users", get(users))
            .route("/helix/extensions/pubsub", post(pubsub))
            .with_state(self.clone())
    }

    pub async fn spawn(&self) -> anyhow::Result<SocketAddr> {
        spawn_http(self.router()).await
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn helix_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    let body = json!({
        "error": status.canonical_reason().unwrap_or_default(),
        "status": status.as_u16(),
        "message": message,
    });
    (status, Json(body))
}

async fn token(
    State(fake): State<FakeTwitch>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    fake.token_requests.lock().await.push(form.clone());
    let field = |k: &str| form.get(k).map(String::as_str).unwrap_or_default();

    if field("client_id") != CLIENT_ID || field("client_secret") != CLIENT_SECRET {
        return (StatusCode::FORBIDDEN, r#"{"status":403,"message":"invalid client secret"}"#.into());
    }

    match (field("grant_type"), field("code")) {
        ("client_credentials", _) => (
            StatusCode::OK,
            json!({ "access_token": APP_TOKEN, "expires_in": 5011271, "token_type": "bearer" })
                .to_string(),
        ),
        ("authorization_code", "good-code") => (
            StatusCode::OK,
            json!({
                "access_token": "user-access",
                "refresh_token": "user-refresh",
                "expires_in": 14124,
                "scope": ["channel:read:subscriptions"],
                "token_type": "bearer",
            })
            .to_string(),
        ),
        ("authorization_code", "flaky-code") => {
            (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable".into())
        }
        ("authorization_code", "garbled-code") => (StatusCode::OK, "{not json".into()),
        ("authorization_code", _) => (
            StatusCode::BAD_REQUEST,
            r#"{"status":400,"message":"Invalid authorization code"}"#.into(),
        ),
        _ => (StatusCode::BAD_REQUEST, r#"{"status":400,"message":"unsupported grant"}"#.into()),
    }
}

async fn validate(headers: HeaderMap) -> (StatusCode, String) {
    match header(&headers, "authorization").as_deref() {
        Some("OAuth good-token") => (
            StatusCode::OK,
            json!({
                "client_id": CLIENT_ID,
                "login": "foo",
                "scopes": [],
                "user_id": "123",
                "expires_in": 5520838,
            })
            .to_string(),
        ),
        Some("OAuth overloaded-token") => (StatusCode::BAD_GATEWAY, "bad gateway".into()),
        _ => (StatusCode::UNAUTHORIZED, r#"{"status":401,"message":"invalid access token"}"#.into()),
    }
}

async fn users(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {APP_TOKEN}");
    if header(&headers, "authorization").as_deref() != Some(expected.as_str())
        || header(&headers, "client-id").as_deref() != Some(CLIENT_ID)
    {
        return helix_error(StatusCode::UNAUTHORIZED, "Invalid OAuth token");
    }

    let login = query.get("login").cloned().unwrap_or_default();
    match login.as_str() {
        "ghost" => (StatusCode::OK, Json(json!({ "data": [] }))),
        "broken" => helix_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        "twins" => (
            StatusCode::OK,
            Json(json!({ "data": [
                { "id": "1", "login": "twins", "display_name": "Twins" },
                { "id": "2", "login": "twins", "display_name": "Twins2" },
            ]})),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({ "data": [{
                "id": "42",
                "login": login,
                "display_name": login.to_uppercase(),
                "type": "",
                "broadcaster_type": "affiliate",
            }]})),
        ),
    }
}

async fn pubsub(
    State(fake): State<FakeTwitch>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let jwt = header(&headers, "authorization")
        .and_then(|h| h.strip_prefix("Bearer ").map(str::to_owned))
        .unwrap_or_default();
    let claims = DecodingKey::from_base64_secret(EXTENSION_SECRET)
        .ok()
        .and_then(|key| {
            jsonwebtoken::decode::<BroadcastClaim>(&jwt, &key, &Validation::new(Algorithm::HS256))
                .ok()
        });
    let Some(claims) = claims else {
        return (StatusCode::UNAUTHORIZED, "JWT could not be verified".into());
    };

    let broadcaster = body["broadcaster_id"].as_str().unwrap_or_default().to_owned();
    fake.publishes.lock().await.push(RecordedPublish {
        client_id: header(&headers, "client-id"),
        claims: claims.claims,
        body,
    });

    match broadcaster.as_str() {
        "blocked" => (StatusCode::FORBIDDEN, "extension is not installed on this channel".into()),
        _ => (StatusCode::NO_CONTENT, String::new()),
    }
}

// -- Chat fake ----------------------------------------------------------------

/// What the fake chat server observed from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Frame(String),
    Closed,
}

/// How the fake chat server answers once it has seen `NICK`.
#[derive(Debug, Clone)]
pub enum ChatScript {
    /// Send these frames, waiting `delay` before each one.
    Reply { delay: Duration, frames: Vec<String> },
    /// Say nothing.
    Silent,
    /// Send a junk frame every `every` until the client leaves.
    Garbage { every: Duration },
}

pub struct ChatServer {
    pub url: String,
    pub events: mpsc::UnboundedReceiver<ChatEvent>,
}

impl ChatServer {
    /// Wait for the client to hang up, collecting frames seen meanwhile.
    pub async fn until_closed(&mut self, within: Duration) -> anyhow::Result<Vec<String>> {
        let mut frames = Vec::new();
        tokio::time::timeout(within, async {
            while let Some(event) = self.events.recv().await {
                match event {
                    ChatEvent::Frame(f) => frames.push(f),
                    ChatEvent::Closed => return Ok(()),
                }
            }
            anyhow::bail!("chat server stopped before the client closed")
        })
        .await
        .map_err(|_| anyhow::anyhow!("client did not close within {within:?}"))??;
        Ok(frames)
    }
}

/// Spawn a fake chat endpoint serving `script` to every connection.
pub async fn spawn_chat(script: ChatScript) -> anyhow::Result<ChatServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            tokio::spawn(serve_chat(tcp, script.clone(), tx.clone()));
        }
    });

    Ok(ChatServer { url: format!("ws://{addr}/"), events: rx })
}

/// Spawn a chat endpoint that completes the WebSocket upgrade and then never
/// reads, so the client's writes back up.
pub async fn spawn_deaf_chat() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Ok(ws) = tokio_tungstenite::accept_async(tcp).await else {
                    return;
                };
                // Hold the connection open without polling it.
                let _ws = ws;
                std::future::pending::<()>().await;
            });
        }
    });

    Ok(format!("ws://{addr}/"))
}

async fn serve_chat(tcp: TcpStream, script: ChatScript, events: mpsc::UnboundedSender<ChatEvent>) {
    let Ok(ws) = tokio_tungstenite::accept_async(tcp).await else {
        return;
    };
    let (mut write, mut read) = ws.split();

    // Replies start once the client has identified itself.
    let (nick_tx, nick_rx) = oneshot::channel::<()>();
    let replier = tokio::spawn(async move {
        if nick_rx.await.is_ok() {
            play(&mut write, script).await;
        }
    });

    let mut nick_tx = Some(nick_tx);
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let text = text.to_string();
                if text.starts_with("NICK ") {
                    if let Some(nick) = nick_tx.take() {
                        let _ = nick.send(());
                    }
                }
                let _ = events.send(ChatEvent::Frame(text));
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    replier.abort();
    let _ = events.send(ChatEvent::Closed);
}

async fn play<S>(sink: &mut S, script: ChatScript)
where
    S: Sink<Message> + Unpin,
{
    match script {
        ChatScript::Silent => {}
        ChatScript::Reply { delay, frames } => {
            for frame in frames {
                tokio::time::sleep(delay).await;
                if sink.send(Message::text(frame)).await.is_err() {
                    return;
                }
            }
        }
        ChatScript::Garbage { every } => loop {
            tokio::time::sleep(every).await;
            let junk = "x\r\n\r\n:tmi.twitch.tv 001 nobody :Hello,\r\n:tmi.twitch.tv  NOTICE";
            if sink.send(Message::text(junk)).await.is_err() {
                return;
            }
        },
    }
}
