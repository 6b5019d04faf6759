// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{challenge::Challenge, error::PowError, hash, solution::Solution};

/// Every `CHECK_EVERY` nonces the solver polls the deadline and cancellation
/// token; this keeps cancellation latency well under the 100 ms target
/// without checking on every single hash.
const CHECK_EVERY: u64 = 1 << 12;

/// Every `YIELD_EVERY` nonces the solver yields to the executor so a
/// cooperatively-scheduled cancellation can be observed.
const YIELD_EVERY: u64 = 1 << 20;

/// Searches for a nonce `n` such that `H(c.ts, c.rb, n)` meets `c.difficulty`.
///
/// Precomputes nothing extra beyond what [`hash::digest`] already does per
/// call; terminates with [`PowError::Timeout`] once `deadline` passes or
/// `cancel` fires, and with [`PowError::Exhausted`] if the nonce space wraps
/// (practically unreachable).
pub async fn solve(
    challenge: &Challenge,
    cancel: &CancellationToken,
    deadline: Instant,
) -> Result<Solution, PowError> {
    if !(0..=256).contains(&challenge.difficulty) {
        return Err(PowError::InvalidInput("difficulty out of range [0, 256]"));
    }

    let mut nonce: u64 = 0;
    loop {
        let digest = hash::digest(challenge.timestamp, &challenge.random_bytes, nonce);
        if hash::leading_zero_bits(&digest) >= challenge.difficulty as u32 {
            return Ok(Solution { nonce });
        }

        let (next, overflowed) = nonce.overflowing_add(1);
        if overflowed {
            return Err(PowError::Exhausted);
        }
        nonce = next;

        if nonce % CHECK_EVERY == 0 && (cancel.is_cancelled() || Instant::now() >= deadline) {
            return Err(PowError::Timeout);
        }
        if nonce % YIELD_EVERY == 0 {
            tokio::task::yield_now().await;
        }
    }
}
