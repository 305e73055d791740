// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Twitch integration for the relics backend: app token, user lookup,
//! chat-secret verification, extension broadcast, and user OAuth.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod extension;
pub mod http;
pub mod oauth;
pub mod streamer;
pub mod token;
pub mod users;

pub use client::Twitch;
pub use config::TwitchConfig;
pub use error::{Error, ErrorKind, TransportError};
pub use users::PlatformUser;
