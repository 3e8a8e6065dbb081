use super::{ReportError, Reporter};
use crate::stat::Stat;
use async_trait::async_trait;

/// Keeps every stat emitted while started.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    started: bool,
    stats: Vec<Stat>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// All recorded stats as a JSON array.
    pub fn dumps(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(&self.stats)?)
    }
}

#[async_trait]
impl Reporter for MemoryReporter {
    fn started(&self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ReportError> {
        self.started = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ReportError> {
        self.started = false;
        Ok(())
    }

    async fn emit(&mut self, stat: &Stat) -> Result<(), ReportError> {
        if self.started {
            self.stats.push(stat.clone());
        }
        Ok(())
    }
}
