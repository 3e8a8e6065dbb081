//! WebSocket endpoint the viewer connects to.
//!
//! The feed serves one viewer at a time. Each forwarded stat line becomes
//! one text message. Lines that arrive while no viewer is connected, or
//! that the viewer did not acknowledge before it left, are kept and sent to
//! the next viewer first. A viewer acknowledges lines by answering the ping
//! sent after them, which WebSocket clients do on their own; a viewer that
//! leaves between reading a line and answering may see it again next time.

mod error;
mod session;

pub use error::FeedError;

use crate::master::LineReceiver;
use session::{SessionEnd, serve_viewer};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Default listen address, matching the viewer's fixed endpoint.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8082";

/// How long a new connection may take to complete the WebSocket handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Feed {
    listener: TcpListener,
    handshake_timeout: Duration,
    backlog: VecDeque<String>,
}

impl Feed {
    pub async fn bind(addr: &str) -> Result<Self, FeedError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| FeedError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            backlog: VecDeque::new(),
        })
    }

    /// Connections that have not finished the handshake within `timeout`
    /// are dropped so the next viewer can be served.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, FeedError> {
        self.listener.local_addr().map_err(FeedError::LocalAddr)
    }

    /// Serve viewers until `lines` is closed.
    pub async fn run(mut self, mut lines: LineReceiver) -> Result<(), FeedError> {
        tracing::info!(addr = %self.local_addr()?, "feed listening");

        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept viewer connection");
                        continue;
                    }
                },
                line = lines.recv() => match line {
                    Some(line) => {
                        self.backlog.push_back(line);
                        continue;
                    }
                    None => break,
                },
            };

            tracing::info!(%peer, backlog = self.backlog.len(), "viewer connected");

            match serve_viewer(
                stream,
                peer,
                self.handshake_timeout,
                &mut lines,
                &mut self.backlog,
            )
            .await
            {
                SessionEnd::ViewerGone => {
                    tracing::info!(%peer, "viewer disconnected");
                }
                SessionEnd::LinesClosed => break,
            }
        }

        tracing::info!(unacknowledged = self.backlog.len(), "feed stopped");
        Ok(())
    }
}
