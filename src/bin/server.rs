// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use powquote::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    quotes::QuoteProvider,
    server::{Listener, ServerStats},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Proof-of-work gated quote server")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = resolve_config_path(&args.config)
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    init_logger(&cfg.log_level).context("failed to initialize logger")?;

    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if res.is_ok() {
                    info!("received interrupt, shutting down");
                }
            }
            _ = terminate.recv() => {
                info!("received SIGTERM, shutting down");
            }
        }
        shutdown.cancel();
    });

    let stats = Arc::new(ServerStats::default());
    let listener = Arc::new(Listener::new(
        Arc::new(cfg.tcp.clone()),
        stats,
        QuoteProvider::default(),
    ));

    listener.run(cancel, cfg.shutdown_timeout).await?;

    info!("shutdown complete");
    Ok(())
}
