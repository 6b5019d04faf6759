// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The proof-of-work engine: challenge generation, validation, and the
//! client-side solver. All three share one hashing rule (see [`hash`]) so
//! there is never more than one way to compute `H(ts, rb, n)`.

pub mod challenge;
pub mod error;
pub mod hash;
pub mod solution;
pub mod solve;

pub use challenge::{generate, Challenge, STALE_AFTER_SECS};
pub use error::PowError;
pub use solution::{validate, Solution};
pub use solve::solve;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as whole seconds since the Unix epoch.
pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
