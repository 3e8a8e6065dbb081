use crate::config::RemoteviewConfig;
use crate::feed::Feed;
use crate::master::{MasterReporter, line_channel};
use anyhow::{Context, Result};
use clap::Args;
use std::future::Future;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to the remoteview config file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run a master and the viewer feed until `shutdown` resolves.
pub async fn run_serve(cfg: RemoteviewConfig, shutdown: impl Future<Output = ()>) -> Result<()> {
    let (tx, rx) = line_channel();

    let mut master = MasterReporter::new(cfg.master.master_config());
    master.start(tx).await.context("failed to start master")?;

    let feed = Feed::bind(&cfg.feed.listen)
        .await
        .context("failed to start viewer feed")?
        .with_handshake_timeout(cfg.feed.handshake_timeout());

    tokio::select! {
        res = feed.run(rx) => res.context("viewer feed failed")?,
        _ = shutdown => tracing::info!("shutdown requested"),
    }

    master.stop().await;
    Ok(())
}
