use crate::harness::{CapturedEvent, captured_events, init_test_tracing};
use remoteview_core::feed::Feed;
use remoteview_core::master::{MasterConfig, MasterReporter, line_channel};
use remoteview_core::reporting::{SlaveConfig, SlaveReporter};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A running master plus viewer feed, both on ephemeral localhost ports.
pub struct TestStack {
    master: MasterReporter,
    feed_task: JoinHandle<()>,
    endpoint: String,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestStack {
    /// Must be called from inside a Tokio runtime.
    pub async fn start() -> Self {
        // Initialize tracing (this must happen first).
        let events = captured_events();
        init_test_tracing(events.clone());

        let (tx, rx) = line_channel();

        let mut master = MasterReporter::new(MasterConfig::new("127.0.0.1", 0));
        master.start(tx).await.expect("failed to start master");

        let feed = Feed::bind("127.0.0.1:0")
            .await
            .expect("failed to bind feed");
        let endpoint = format!("ws://{}", feed.local_addr().unwrap());

        let feed_task = tokio::spawn(async move {
            feed.run(rx).await.expect("feed failed");
        });

        Self {
            master,
            feed_task,
            endpoint,
            events,
        }
    }

    /// WebSocket address a viewer should connect to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn master_port(&self) -> u16 {
        self.master.port()
    }

    pub fn slaves_seen(&self) -> usize {
        self.master.slaves().len()
    }

    /// A slave reporter pointed at this stack's master.
    pub fn slave(&self) -> SlaveReporter {
        let mut config = SlaveConfig::new("127.0.0.1", self.master_port());
        config.retries = Some(10);
        config.retry_delay = Duration::from_millis(25);
        SlaveReporter::new(config)
    }

    /// Events captured so far whose target starts with `prefix`.
    pub fn events_for(&self, prefix: &str) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Stop the master; the feed closes the viewer once it drains.
    pub async fn shutdown(mut self) {
        self.master.stop().await;
        tokio::time::timeout(Duration::from_secs(2), self.feed_task)
            .await
            .expect("feed did not stop")
            .expect("feed task panicked");
    }
}
