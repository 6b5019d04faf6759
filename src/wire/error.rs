// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Errors raised while encoding or decoding wire frames.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("truncated frame: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("response exceeded maximum size of {max} bytes")]
    ResponseTooLarge { max: usize },

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("connection closed before a complete frame was received")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
