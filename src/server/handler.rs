// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-connection state machine: issue a challenge, wait for a solution,
//! validate it, and respond with a quote or an error.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    cfg::config::ServerConfig,
    pow::{self, Challenge, Solution, PowError},
    quotes::QuoteProvider,
    server::{stats::ServerStats, tracked_stream::TrackedStream},
    wire::{challenge_frame, solution_frame, QuoteResponse, CHALLENGE_FRAME_LEN, SOLUTION_FRAME_LEN},
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("challenge generation failed: {0}")]
    Challenge(#[from] PowError),

    #[error(transparent)]
    Frame(#[from] crate::wire::FrameError),

    #[error("overall handler deadline exceeded")]
    HandlerTimeout,
}

/// One pass through the handler's linear state machine. Kept as a plain enum
/// matched in a loop rather than a generic trait object: every connection
/// runs the same five states in the same order, so there is nothing to
/// dispatch over.
enum State {
    WritingChallenge,
    AwaitingSolution { challenge: Challenge },
    Validating { challenge: Challenge, solution: Solution },
    WritingResponse { response: QuoteResponse },
    Done,
}

/// Drives one accepted connection to completion, bounded by
/// `cfg.handler_timeout` end to end.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    cfg: Arc<ServerConfig>,
    stats: Arc<ServerStats>,
    quotes: QuoteProvider,
    cancel: CancellationToken,
) -> Result<(), HandlerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stats.record_accept();
    stats.touch(pow::now_unix_seconds());
    let mut tracked = TrackedStream::new(stream, cfg.read_timeout, cfg.write_timeout, Arc::clone(&stats));

    let run = run_state_machine(&mut tracked, &cfg, &stats, &quotes, &cancel, peer);
    match tokio::time::timeout(cfg.handler_timeout, run).await {
        Ok(res) => res,
        Err(_) => {
            stats.record_timed_out();
            warn!(%peer, "handler deadline exceeded");
            Err(HandlerError::HandlerTimeout)
        },
    }
}

async fn run_state_machine<S>(
    stream: &mut TrackedStream<S>,
    cfg: &ServerConfig,
    stats: &ServerStats,
    quotes: &QuoteProvider,
    cancel: &CancellationToken,
    peer: SocketAddr,
) -> Result<(), HandlerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut state = State::WritingChallenge;
    loop {
        state = match state {
            State::WritingChallenge => {
                let challenge = pow::generate(cfg.pow_difficulty)?;
                let frame = challenge_frame::encode(&challenge);
                debug_assert_eq!(frame.len(), CHALLENGE_FRAME_LEN);
                stream.write_all(&frame, cancel).await?;
                stats.record_challenge_sent();
                stats.touch(pow::now_unix_seconds());
                debug!(%peer, difficulty = cfg.pow_difficulty, "challenge sent");
                State::AwaitingSolution { challenge }
            },

            State::AwaitingSolution { challenge } => {
                let mut buf = [0u8; SOLUTION_FRAME_LEN];
                stream.read_exact(&mut buf, cancel).await?;
                stats.touch(pow::now_unix_seconds());
                let solution = solution_frame::decode(&buf)?;
                State::Validating { challenge, solution }
            },

            State::Validating { challenge, solution } => {
                let response = if pow::validate(&challenge, &solution) {
                    stats.record_solution_accepted();
                    match quotes.draw() {
                        Ok(quote) => QuoteResponse::quote(quote.text),
                        Err(e) => QuoteResponse::error(e.to_string()),
                    }
                } else {
                    stats.record_solution_rejected();
                    if pow::now_unix_seconds() - challenge.timestamp > pow::STALE_AFTER_SECS {
                        stats.record_stale_rejected();
                    }
                    info!(%peer, "rejected invalid proof of work");
                    QuoteResponse::error("invalid proof of work")
                };
                State::WritingResponse { response }
            },

            State::WritingResponse { response } => {
                // quote_response::write_response serializes + appends a
                // newline in one shot; wrap it with the same idle timeout
                // the tracked stream otherwise enforces.
                let mut buf = serde_json::to_vec(&response).map_err(crate::wire::FrameError::from)?;
                buf.push(b'\n');
                stream.write_all(&buf, cancel).await?;
                stats.touch(pow::now_unix_seconds());
                State::Done
            },

            State::Done => return Ok(()),
        };
    }
}
