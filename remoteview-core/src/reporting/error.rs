use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("connection to master {host}:{port} failed after {attempts} attempt(s): {source}")]
    Connect {
        host: String,
        port: u16,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind master on {host}:{port}: {source}")]
    Bind {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open stat stream {path}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write stat to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode stat: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0} sub-reporter(s) failed: {1}")]
    Children(usize, Box<ReportError>),
}

impl ReportError {
    pub fn write(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            target: target.into(),
            source,
        }
    }
}
