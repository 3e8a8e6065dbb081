//! TCP receiver for stats sent by slave reporters.

#[cfg(test)]
mod tests;

use crate::reporting::ReportError;
use crate::stat::LineDecoder;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Longest unterminated line a slave may send before it is disconnected.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Receiving end of the lines a master forwards.
pub type LineReceiver = mpsc::UnboundedReceiver<String>;
/// Sending end handed to [`MasterReporter::start`].
pub type LineSender = mpsc::UnboundedSender<String>;

/// Channel carrying forwarded stat lines from a master to a consumer.
pub fn line_channel() -> (LineSender, LineReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug, Clone)]
pub struct MasterConfig {
    pub host: String,

    /// `0` binds an ephemeral port; see [`MasterReporter::port`].
    pub port: u16,

    /// Size of each read from a slave connection.
    pub buffer_size: usize,

    pub max_line_bytes: usize,
}

impl MasterConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Accepts slave connections and forwards every complete stat line.
///
/// Lines are forwarded verbatim, without their `'\n'` terminator, in the
/// order each slave sent them. A slave whose unterminated line outgrows
/// `max_line_bytes` is disconnected.
pub struct MasterReporter {
    config: MasterConfig,
    local_addr: Option<SocketAddr>,
    slaves: Arc<Mutex<Vec<SocketAddr>>>,
    accept_task: Option<JoinHandle<()>>,
}

impl MasterReporter {
    pub fn new(config: MasterConfig) -> Self {
        Self {
            config,
            local_addr: None,
            slaves: Arc::new(Mutex::new(Vec::new())),
            accept_task: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The bound port once started, the configured one before.
    pub fn port(&self) -> u16 {
        self.local_addr
            .map(|addr| addr.port())
            .unwrap_or(self.config.port)
    }

    pub fn started(&self) -> bool {
        self.accept_task.is_some()
    }

    /// Peer addresses of every slave that connected since the last start.
    pub fn slaves(&self) -> Vec<SocketAddr> {
        self.slaves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn start(&mut self, forward: LineSender) -> Result<SocketAddr, ReportError> {
        if let Some(addr) = self.local_addr.filter(|_| self.started()) {
            return Ok(addr);
        }

        let MasterConfig { host, port, .. } = &self.config;
        tracing::info!(host, port, "starting master");

        let bind_error = |source| {
            tracing::error!(host, port, "failed to start master");
            ReportError::Bind {
                host: host.clone(),
                port: *port,
                source,
            }
        };

        let listener = TcpListener::bind((host.as_str(), *port))
            .await
            .map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        tracing::info!(%addr, "master started");

        self.slaves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.local_addr = Some(addr);
        let limits = ReadLimits {
            buffer_size: self.config.buffer_size.max(1),
            max_line_bytes: self.config.max_line_bytes,
        };
        self.accept_task = Some(tokio::spawn(accept_slaves(
            listener,
            limits,
            self.slaves.clone(),
            forward,
        )));

        Ok(addr)
    }

    /// Stop accepting slaves and drop every open slave connection.
    pub async fn stop(&mut self) {
        let Some(task) = self.accept_task.take() else {
            return;
        };

        task.abort();
        let _ = task.await;
        tracing::info!(port = self.port(), "master stopped");
    }
}

impl Drop for MasterReporter {
    fn drop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ReadLimits {
    buffer_size: usize,
    max_line_bytes: usize,
}

async fn accept_slaves(
    listener: TcpListener,
    limits: ReadLimits,
    slaves: Arc<Mutex<Vec<SocketAddr>>>,
    forward: LineSender,
) {
    // Dropping the set (when this task is aborted) aborts every slave task.
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    slaves
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(peer);
                    connections.spawn(read_slave(stream, peer, limits, forward.clone()));
                }
                Err(e) => tracing::warn!(error = %e, "failed to accept slave connection"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }
}

async fn read_slave(mut stream: TcpStream, peer: SocketAddr, limits: ReadLimits, forward: LineSender) {
    tracing::info!(%peer, "connection from slave");

    let mut decoder = LineDecoder::with_max_line(limits.max_line_bytes);
    let mut buf = vec![0u8; limits.buffer_size];
    let mut forwarded = 0usize;

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(%peer, error = %e, "slave connection failed");
                break;
            }
        };

        for line in decoder.feed(&buf[..n]) {
            if forward.send(line).is_err() {
                tracing::debug!(%peer, "stat consumer gone, closing slave connection");
                return;
            }
            forwarded += 1;
        }

        if decoder.overflowed() {
            tracing::warn!(
                %peer,
                limit = limits.max_line_bytes,
                "stat line too long, closing slave connection"
            );
            break;
        }
    }

    if !decoder.remaining().is_empty() {
        tracing::debug!(
            %peer,
            bytes = decoder.remaining().len(),
            "discarding unterminated stat line"
        );
    }
    tracing::info!(%peer, forwarded, "slave disconnected");
}
