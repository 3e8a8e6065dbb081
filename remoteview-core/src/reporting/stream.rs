use super::{ReportError, Reporter};
use crate::stat::{Stat, encode_line};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};

type StatWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Writes stats as newline-delimited JSON.
///
/// A reporter built with [`StreamReporter::to_file`] opens the file
/// (create + append) on start and closes it on stop. One built with
/// [`StreamReporter::to_writer`] borrows nothing: the writer is owned for
/// the reporter's lifetime and only flushed on stop.
pub struct StreamReporter {
    path: Option<PathBuf>,
    writer: Option<StatWriter>,
    started: bool,
}

impl StreamReporter {
    pub fn to_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            path: None,
            writer: Some(Box::new(writer)),
            started: false,
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            writer: None,
            started: false,
        }
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "stream".to_string(),
    }
}

#[async_trait]
impl Reporter for StreamReporter {
    fn started(&self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ReportError> {
        if self.started {
            return Ok(());
        }

        if let Some(path) = &self.path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .map_err(|source| ReportError::Open {
                    path: path.clone(),
                    source,
                })?;
            self.writer = Some(Box::new(file));
        }

        self.started = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ReportError> {
        if !self.started {
            return Ok(());
        }
        self.started = false;

        let owns_file = self.path.is_some();
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .await
                .map_err(|e| ReportError::write(describe(&self.path), e))?;
            if owns_file {
                writer
                    .shutdown()
                    .await
                    .map_err(|e| ReportError::write(describe(&self.path), e))?;
            }
        }

        if owns_file {
            self.writer = None;
        }
        Ok(())
    }

    async fn emit(&mut self, stat: &Stat) -> Result<(), ReportError> {
        if !self.started {
            return Ok(());
        }

        let line = encode_line(stat)?;
        if let Some(writer) = self.writer.as_mut() {
            writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| ReportError::write(describe(&self.path), e))?;
        }
        Ok(())
    }
}
