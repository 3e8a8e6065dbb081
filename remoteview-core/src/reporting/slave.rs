use super::{ReportError, Reporter};
use crate::stat::{Stat, encode_line};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Where and how a slave reaches its master.
#[derive(Debug, Clone)]
pub struct SlaveConfig {
    pub host: String,
    pub port: u16,

    /// Extra connection attempts after the first one. `None` retries forever.
    pub retries: Option<u32>,

    pub retry_delay: Duration,
}

impl SlaveConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            retries: None,
            retry_delay: Duration::from_secs(1),
        }
    }

    fn may_retry(&self, failed_attempts: u32) -> bool {
        self.retries.is_none_or(|retries| failed_attempts <= retries)
    }
}

/// Sends every emitted stat to a master over TCP, one JSON object per line.
pub struct SlaveReporter {
    config: SlaveConfig,
    stream: Option<TcpStream>,
}

impl SlaveReporter {
    pub fn new(config: SlaveConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    pub fn config(&self) -> &SlaveConfig {
        &self.config
    }

    async fn connect(&self) -> Result<TcpStream, ReportError> {
        let SlaveConfig { host, port, .. } = &self.config;
        let mut failed = 0u32;

        loop {
            tracing::info!(host, port, "connecting to master");

            match TcpStream::connect((host.as_str(), *port)).await {
                Ok(stream) => {
                    tracing::info!(host, port, "connected to master");
                    return Ok(stream);
                }
                Err(source) => {
                    failed += 1;
                    if !self.config.may_retry(failed) {
                        return Err(ReportError::Connect {
                            host: host.clone(),
                            port: *port,
                            attempts: failed,
                            source,
                        });
                    }

                    tracing::error!(error = %source, "connection to master failed");
                    tracing::info!(
                        retry_delay_ms = self.config.retry_delay.as_millis() as u64,
                        "retrying connection to master"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl Reporter for SlaveReporter {
    fn started(&self) -> bool {
        self.stream.is_some()
    }

    async fn start(&mut self) -> Result<(), ReportError> {
        if self.started() {
            return Ok(());
        }

        self.stream = Some(self.connect().await?);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ReportError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };

        let target = format!("{}:{}", self.config.host, self.config.port);
        stream
            .shutdown()
            .await
            .map_err(|e| ReportError::write(target, e))
    }

    async fn emit(&mut self, stat: &Stat) -> Result<(), ReportError> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };

        let line = encode_line(stat)?;
        let target = format!("{}:{}", self.config.host, self.config.port);
        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ReportError::write(target, e))
    }
}
