use crate::display::{DisplayList, TerminalSurface};
use crate::viewer::Viewer;
use anyhow::{Context, Result};
use clap::Args;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Write the displayed messages as an HTML page once the connection ends
    #[arg(long)]
    pub html: Option<PathBuf>,
}

/// Show every message from the feed on stdout, one per line.
///
/// Connection failures are not errors: the viewer just stops.
pub async fn run_view(args: ViewArgs) -> Result<()> {
    let surface = (TerminalSurface::new(io::stdout()), DisplayList::new());
    let session = Viewer::new(surface).run().await;

    tracing::info!(
        exit = ?session.exit,
        received = session.received,
        "viewer finished"
    );

    if let Some(path) = args.html {
        let (_, list) = session.surface;
        std::fs::write(&path, list.render_page())
            .with_context(|| format!("failed to write page to {}", path.display()))?;
        tracing::info!(path = %path.display(), paragraphs = list.len(), "page written");
    }

    Ok(())
}
