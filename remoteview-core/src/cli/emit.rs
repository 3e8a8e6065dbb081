use crate::config::RemoteviewConfig;
use crate::reporting::{Reporter, SlaveReporter, info};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Path to the remoteview config file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Report each input line to the master as an `info` stat.
///
/// Returns the number of stats sent.
pub async fn run_emit<R>(cfg: RemoteviewConfig, input: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut slave = SlaveReporter::new(cfg.slave.slave_config());
    slave.start().await.context("failed to connect to master")?;

    let mut lines = input.lines();
    let mut sent = 0usize;
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        info(&mut slave, line, None).await?;
        sent += 1;
    }

    slave.stop().await?;
    tracing::info!(sent, "stats emitted");
    Ok(sent)
}
