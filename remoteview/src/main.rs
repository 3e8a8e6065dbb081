use clap::{Parser, Subcommand};
use remoteview_core::cli;
use remoteview_core::config::RemoteviewConfig;
use remoteview_core::logging::init_logging;
use std::path::PathBuf;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(
    name = "remoteview",
    version,
    about = "remoteview: live viewer for test stats"
)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Display messages from the feed (default)
    View(cli::view::ViewArgs),

    /// Receive stats from slaves and serve them to a viewer
    Serve(cli::serve::ServeArgs),

    /// Send stdin lines to the master as info stats
    Emit(cli::emit::EmitArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard = init_logging(cli.output.as_deref()).expect("Failed to initialize logging");

    let command = cli
        .command
        .unwrap_or(Command::View(cli::view::ViewArgs { html: None }));

    let result = match command {
        Command::View(args) => cli::view::run_view(args).await,

        Command::Serve(args) => match RemoteviewConfig::load(args.config.as_deref()) {
            Ok(cfg) => cli::serve::run_serve(cfg, shutdown_signal()).await,
            Err(e) => Err(e.into()),
        },

        Command::Emit(args) => match RemoteviewConfig::load(args.config.as_deref()) {
            Ok(cfg) => cli::emit::run_emit(cfg, BufReader::new(tokio::io::stdin()))
                .await
                .map(|_| ()),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "remoteview failed");
        eprintln!("remoteview error: {e:#}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
