use super::{ReportError, Reporter};
use crate::stat::Stat;
use async_trait::async_trait;
use futures_util::future::join_all;

/// Fans stats out to a set of child reporters.
///
/// Children are driven concurrently. When some of them fail the others
/// still complete, and the first failure is returned.
#[derive(Default)]
pub struct MetaReporter {
    started: bool,
    reporters: Vec<Box<dyn Reporter>>,
}

impl MetaReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// Remove and return the child at `index`, if any.
    pub fn remove_reporter(&mut self, index: usize) -> Option<Box<dyn Reporter>> {
        (index < self.reporters.len()).then(|| self.reporters.remove(index))
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub fn reporters(&self) -> &[Box<dyn Reporter>] {
        &self.reporters
    }
}

fn first_failure(results: Vec<Result<(), ReportError>>) -> Result<(), ReportError> {
    let mut errors = results.into_iter().filter_map(Result::err);
    let Some(first) = errors.next() else {
        return Ok(());
    };

    let count = 1 + errors.count();
    tracing::warn!(failed = count, error = %first, "sub-reporters failed");
    Err(ReportError::Children(count, Box::new(first)))
}

#[async_trait]
impl Reporter for MetaReporter {
    fn started(&self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ReportError> {
        if self.started {
            return Ok(());
        }

        let results = join_all(self.reporters.iter_mut().map(|r| r.start())).await;
        self.started = true;
        first_failure(results)
    }

    async fn stop(&mut self) -> Result<(), ReportError> {
        if !self.started {
            return Ok(());
        }

        let results = join_all(self.reporters.iter_mut().map(|r| r.stop())).await;
        self.started = false;
        first_failure(results)
    }

    async fn emit(&mut self, stat: &Stat) -> Result<(), ReportError> {
        if !self.started {
            return Ok(());
        }

        let results = join_all(self.reporters.iter_mut().map(|r| r.emit(stat))).await;
        first_failure(results)
    }
}
