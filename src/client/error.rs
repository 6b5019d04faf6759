// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

use crate::{pow::PowError, wire::FrameError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Any phase — connect, challenge read, solve, or response read —
    /// exceeded its configured deadline.
    #[error("{phase} timed out")]
    Timeout { phase: &'static str },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("proof-of-work solving failed: {0}")]
    Solve(#[from] PowError),

    #[error("server reported an error: {0}")]
    ServerReported(String),

    #[error("server returned an empty quote")]
    EmptyQuote,
}
