// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifier for chat frames received during the PASS/NICK handshake.
//!
//! Grammar: a frame is split on `\r\n` into lines, each line on single
//! spaces into tokens. Lines with fewer than two tokens are skipped. Only the
//! second token classifies a line:
//!
//! - `001` with a fourth token of exactly `:Welcome,` → the third token is the
//!   canonical login;
//! - `NOTICE` → the server rejected the credential;
//! - anything else → ignored.

/// Outcome decided by a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Server welcomed us under this login.
    Welcome(String),
    /// Server sent a NOTICE; the full line is kept for context.
    Notice(String),
}

/// Classify a frame. The first deciding line wins; `None` means keep reading.
pub fn parse_frame(frame: &str) -> Option<Reply> {
    frame.split("\r\n").find_map(parse_line)
}

fn parse_line(line: &str) -> Option<Reply> {
    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() < 2 {
        return None;
    }
    match parts[1] {
        "001" => match parts.get(2..4) {
            Some([login, ":Welcome,"]) => Some(Reply::Welcome((*login).to_owned())),
            _ => None,
        },
        "NOTICE" => Some(Reply::Notice(line.to_owned())),
        _ => None,
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
