// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Binds the listening socket, accepts connections, and spawns one handler
//! task per connection. Each handler runs in its own `tokio::spawn`, so a
//! panic in one session cannot take down the listener or any other session.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    cfg::config::ServerConfig,
    quotes::QuoteProvider,
    server::{handler, stats::ServerStats},
};

/// Owns the bound socket and the set of in-flight handler tasks, so it can
/// wait for them to drain on shutdown.
pub struct Listener {
    cfg: Arc<ServerConfig>,
    stats: Arc<ServerStats>,
    quotes: QuoteProvider,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Listener {
    pub fn new(cfg: Arc<ServerConfig>, stats: Arc<ServerStats>, quotes: QuoteProvider) -> Self {
        Listener {
            cfg,
            stats,
            quotes,
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }

    /// Binds `cfg.addr` and accepts connections until `cancel` fires, then
    /// waits up to `shutdown_timeout` for in-flight handlers to finish.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken, shutdown_timeout: std::time::Duration) -> Result<()> {
        let listener = TcpListener::bind(&self.cfg.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.cfg.addr))?;
        info!(addr = %self.cfg.addr, "listening");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(v) => v,
                        Err(e) => {
                            warn!("accept failed: {e}");
                            continue;
                        }
                    };
                    self.spawn_handler(stream, peer, cancel.clone()).await;
                }
            }
        }

        self.drain(shutdown_timeout).await;
        Ok(())
    }

    async fn spawn_handler(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        peer: std::net::SocketAddr,
        cancel: CancellationToken,
    ) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(%peer, "failed to set TCP_NODELAY: {e}");
        }

        let cfg = Arc::clone(&self.cfg);
        let stats = Arc::clone(&self.stats);
        let quotes = self.quotes;

        let handle = tokio::spawn(async move {
            if let Err(e) = handler::handle_connection(stream, peer, cfg, stats, quotes, cancel).await {
                warn!(%peer, "handler exited with error: {e}");
            }
        });

        self.handles.lock().await.push(handle);
        // Opportunistically drop handles for tasks that already finished, so
        // this vector doesn't grow unbounded across a long-lived listener.
        self.handles.lock().await.retain(|h| !h.is_finished());
    }

    /// Waits for in-flight handlers to finish, up to `timeout`.
    async fn drain(&self, timeout: std::time::Duration) {
        let handles = std::mem::take(&mut *self.handles.lock().await);
        if handles.is_empty() {
            return;
        }
        info!(count = handles.len(), "waiting for in-flight handlers to finish");
        let joined = tokio::time::timeout(timeout, futures_join_all(handles)).await;
        if joined.is_err() {
            warn!("shutdown timeout elapsed with handlers still in flight");
        }
    }
}

/// A small stand-in for `futures::future::join_all` so we don't need to pull
/// in the `futures` crate for one call site.
async fn futures_join_all(handles: Vec<JoinHandle<()>>) {
    for h in handles {
        let _ = h.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_config(addr: &str) -> Arc<ServerConfig> {
        Arc::new(ServerConfig {
            addr: addr.to_string(),
            pow_difficulty: 0,
            read_timeout: Duration::from_secs(2),
            write_timeout: Duration::from_secs(2),
            handler_timeout: Duration::from_secs(5),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn serves_one_connection_end_to_end() {
        // bind to an ephemeral port directly so the test doesn't race on a fixed port
        let probe = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = probe.local_addr().expect("addr");
        drop(probe);

        let cfg = test_config(&addr.to_string());
        let stats = Arc::new(ServerStats::default());
        let listener = Arc::new(Listener::new(cfg, stats, QuoteProvider::default()));
        let cancel = CancellationToken::new();

        let run_cancel = cancel.clone();
        let run_handle = tokio::spawn(listener.clone().run(run_cancel, Duration::from_secs(1)));

        // give the listener a moment to bind and start accepting
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
        let mut challenge_buf = [0u8; crate::wire::CHALLENGE_FRAME_LEN];
        stream.read_exact(&mut challenge_buf).await.expect("read challenge");
        crate::wire::challenge_frame::decode(&challenge_buf).expect("decode");
        let solution = crate::pow::Solution { nonce: 0 };
        stream
            .write_all(&crate::wire::solution_frame::encode(&solution))
            .await
            .expect("write solution");

        let mut byte = [0u8; 1];
        let mut buf = Vec::new();
        loop {
            let n = stream.read(&mut byte).await.expect("read response");
            assert!(n > 0);
            if byte[0] == b'\n' {
                break;
            }
            buf.push(byte[0]);
        }
        assert!(!buf.is_empty());

        cancel.cancel();
        run_handle.await.expect("join").expect("run result");
    }
}
