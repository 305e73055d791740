// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extension broadcast: claim signing and PubSub publication.

pub mod claims;
pub mod pubsub;
