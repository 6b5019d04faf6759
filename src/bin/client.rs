// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use clap::Parser;
use powquote::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    client::get_quote,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(about = "Proof-of-work gated quote client")]
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
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
        shutdown.cancel();
    });

    match get_quote(&cfg.tcp_client.url, &cfg.tcp_client, &cancel).await {
        Ok(quote) => {
            info!(%quote, "received quote");
            println!("{quote}");
            Ok(())
        },
        Err(e) => {
            error!("failed to obtain a quote: {e}");
            Err(anyhow::anyhow!(e))
        },
    }
}
