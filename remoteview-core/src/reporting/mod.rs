//! Reporters collect stats emitted while tests run.
//!
//! Every reporter follows the same lifecycle: stats are only recorded or
//! forwarded between [`Reporter::start`] and [`Reporter::stop`]; anything
//! emitted outside that window is ignored. Starting twice or stopping a
//! stopped reporter does nothing.

mod error;
mod memory;
mod meta;
mod profile;
mod slave;
mod stream;
#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use memory::MemoryReporter;
pub use meta::MetaReporter;
pub use profile::{info, profile};
pub use slave::{SlaveConfig, SlaveReporter};
pub use stream::StreamReporter;

use crate::stat::Stat;
use async_trait::async_trait;

#[async_trait]
pub trait Reporter: Send {
    /// Whether emitted stats are currently reported.
    fn started(&self) -> bool;

    async fn start(&mut self) -> Result<(), ReportError>;

    async fn stop(&mut self) -> Result<(), ReportError>;

    async fn emit(&mut self, stat: &Stat) -> Result<(), ReportError>;
}
