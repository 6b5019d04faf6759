// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A thin wrapper around a connection that arms a per-operation idle timeout
//! and counts bytes moved, generalizing the `io_with_timeout` helper used by
//! the original TCP client around every read/write.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::server::stats::ServerStats;
use crate::wire::FrameError;

/// Wraps any duplex stream, applying an idle timeout and cancellation check
/// to every read or write and tallying bytes moved in each direction, both
/// locally and into the shared `ServerStats`.
#[derive(Debug)]
pub struct TrackedStream<S> {
    inner: S,
    read_timeout: Duration,
    write_timeout: Duration,
    bytes_read: u64,
    bytes_written: u64,
    stats: Arc<ServerStats>,
}

impl<S> TrackedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(inner: S, read_timeout: Duration, write_timeout: Duration, stats: Arc<ServerStats>) -> Self {
        TrackedStream {
            inner,
            read_timeout,
            write_timeout,
            bytes_read: 0,
            bytes_written: 0,
            stats,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Reads exactly `buf.len()` bytes, aborting on idle timeout or
    /// cancellation.
    pub async fn read_exact(
        &mut self,
        buf: &mut [u8],
        cancel: &CancellationToken,
    ) -> Result<(), FrameError> {
        let n = self
            .io_with_timeout("read", self.inner.read_exact(buf), self.read_timeout, cancel)
            .await?;
        self.bytes_read += n as u64;
        self.stats.record_bytes_read(n as u64);
        Ok(())
    }

    /// Writes the full buffer, aborting on idle timeout or cancellation.
    pub async fn write_all(
        &mut self,
        buf: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), FrameError> {
        self.io_with_timeout("write", self.inner.write_all(buf), self.write_timeout, cancel)
            .await?;
        self.bytes_written += buf.len() as u64;
        self.stats.record_bytes_written(buf.len() as u64);
        Ok(())
    }

    async fn io_with_timeout<F, T>(
        &self,
        label: &'static str,
        fut: F,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<T, FrameError>
    where
        F: std::future::Future<Output = std::io::Result<T>>,
    {
        tokio::select! {
            _ = cancel.cancelled() => Err(FrameError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("{label} cancelled"),
            ))),
            res = tokio::time::timeout(timeout, fut) => match res {
                Ok(Ok(v)) => Ok(v),
                Ok(Err(e)) => Err(FrameError::Io(e)),
                Err(_) => Err(FrameError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("{label} idle timeout after {timeout:?}"),
                ))),
            },
        }
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}
