// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Drives the client side of one handshake: connect, read the challenge,
//! solve it, submit the solution, and read back the quote.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    cfg::config::ClientConfig,
    client::error::ClientError,
    pow,
    wire::{challenge_frame, quote_response, solution_frame, CHALLENGE_FRAME_LEN, MAX_RESPONSE_LEN},
};

/// Runs one full handshake against `server_address` and returns the quote
/// text on success.
pub async fn get_quote(
    server_address: &str,
    cfg: &ClientConfig,
    cancel: &CancellationToken,
) -> Result<String, ClientError> {
    let mut stream = connect(server_address, cfg.connect_timeout).await?;

    let challenge = read_challenge(&mut stream, cfg.read_timeout).await?;
    debug!(difficulty = challenge.difficulty, "challenge received");

    let deadline = Instant::now() + cfg.solution_timeout;
    let solution = pow::solve(&challenge, cancel, deadline)
        .await
        .map_err(ClientError::Solve)?;
    info!("solved proof of work, submitting solution");

    write_solution(&mut stream, &solution, cfg.write_timeout, cancel).await?;

    let response = io_with_timeout(
        cfg.read_timeout,
        quote_response::read_response(&mut stream, MAX_RESPONSE_LEN),
        cancel,
    )
    .await?;

    if !response.error.is_empty() {
        return Err(ClientError::ServerReported(response.error));
    }
    if response.quote.is_empty() {
        return Err(ClientError::EmptyQuote);
    }
    Ok(response.quote)
}

async fn connect(server_address: &str, connect_timeout: Duration) -> Result<TcpStream, ClientError> {
    match timeout(connect_timeout, TcpStream::connect(server_address)).await {
        Ok(Ok(stream)) => {
            let _ = stream.set_nodelay(true);
            Ok(stream)
        },
        Ok(Err(source)) => Err(ClientError::Connect { addr: server_address.to_string(), source }),
        Err(_) => Err(ClientError::Timeout { phase: "connect" }),
    }
}

async fn read_challenge(
    stream: &mut TcpStream,
    read_timeout: Duration,
) -> Result<pow::Challenge, ClientError> {
    let mut buf = [0u8; CHALLENGE_FRAME_LEN];
    timeout(read_timeout, stream.read_exact(&mut buf))
        .await
        .map_err(|_| ClientError::Timeout { phase: "challenge read" })?
        .map_err(|e| ClientError::Frame(crate::wire::FrameError::Io(e)))?;
    Ok(challenge_frame::decode(&buf)?)
}

/// Writes the 8-byte solution frame under both a write deadline and
/// cancellation, the same discipline `read_challenge` applies to its read.
async fn write_solution(
    stream: &mut TcpStream,
    solution: &pow::Solution,
    write_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), ClientError> {
    let frame = solution_frame::encode(solution);
    tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Timeout { phase: "solution write (cancelled)" }),
        res = timeout(write_timeout, stream.write_all(&frame)) => match res {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ClientError::Frame(crate::wire::FrameError::Io(e))),
            Err(_) => Err(ClientError::Timeout { phase: "solution write" }),
        },
    }
}

/// Generalizes the original TCP client's per-call timeout/cancel wrapper to
/// this module's error type.
async fn io_with_timeout<F, T>(
    dur: Duration,
    fut: F,
    cancel: &CancellationToken,
) -> Result<T, ClientError>
where
    F: std::future::Future<Output = Result<T, crate::wire::FrameError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Timeout { phase: "response read (cancelled)" }),
        res = timeout(dur, fut) => match res {
            Ok(inner) => inner.map_err(ClientError::from),
            Err(_) => Err(ClientError::Timeout { phase: "response read" }),
        },
    }
}
