// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat connection used only to check a streamer's secret.

pub mod parse;
pub mod verify;
