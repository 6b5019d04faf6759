// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Errors raised by the PoW engine (`generate`, `validate`, `solve`).
#[derive(Debug, Error)]
pub enum PowError {
    #[error("difficulty {0} out of range [0, 256]")]
    InvalidDifficulty(i32),

    #[error("invalid solver input: {0}")]
    InvalidInput(&'static str),

    #[error("solver deadline or cancellation reached before a solution was found")]
    Timeout,

    #[error("nonce space exhausted without a solution")]
    Exhausted,
}
