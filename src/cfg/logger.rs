// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Logger initialization. Unlike the original project's JSON span-capturing
//! formatter, this binary only needs a plain, human-readable stream: one
//! process, one TCP role, no cross-service trace correlation to preserve.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `tracing` subscriber. `level` is a level name such as
/// `"info"` or `"debug"`; it is used only when `RUST_LOG` is unset.
pub fn init_logger(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("failed to build log filter from RUST_LOG or configured log_level")?;

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install global tracing subscriber: {e}"))
}
