use integration_tests::harness::TestStack;
use pretty_assertions::assert_eq;
use remoteview_core::display::DisplayList;
use remoteview_core::reporting::{MetaReporter, MemoryReporter, Reporter, info, profile};
use remoteview_core::stat::{Stat, StatEvent};
use remoteview_core::viewer::{Viewer, ViewerExit};
use std::time::Duration;

#[test]
fn slave_stats_reach_the_viewer() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let stack = TestStack::start().await;
        let viewer = tokio::spawn(
            Viewer::with_endpoint(stack.endpoint().to_string(), DisplayList::new()).run(),
        );

        let mut slave = stack.slave();
        slave.start().await.unwrap();
        info(&mut slave, "host started", None).await.unwrap();
        profile(&mut slave, "create_game", async {}).await.unwrap();
        slave.stop().await.unwrap();

        // Let the stats travel through master and feed.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(stack.slaves_seen(), 1);
        let disconnected = stack
            .events_for("remoteview_core::master")
            .iter()
            .any(|e| e.message() == Some("slave disconnected") && e.field("forwarded") == Some("3"));
        assert!(disconnected, "expected master to log the slave leaving");
        stack.shutdown().await;

        let session = tokio::time::timeout(Duration::from_secs(2), viewer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.exit, ViewerExit::Closed);

        let stats: Vec<Stat> = session
            .surface
            .texts()
            .into_iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect();
        let kinds: Vec<_> = stats.iter().map(Stat::kind).collect();
        assert_eq!(kinds, vec!["info", "enter", "exit"]);
        assert_eq!(stats[0], Stat::info("host started", None));
        assert!(matches!(&stats[2].event, StatEvent::Exit { name, .. } if name == "create_game"));
    });
}

#[test]
fn stats_emitted_before_viewer_connects_are_not_lost() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let stack = TestStack::start().await;

        let mut slave = stack.slave();
        slave.start().await.unwrap();
        for i in 0..10 {
            info(&mut slave, format!("early {i}"), Some(true)).await.unwrap();
        }
        slave.stop().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let viewer = tokio::spawn(
            Viewer::with_endpoint(stack.endpoint().to_string(), DisplayList::new()).run(),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
        stack.shutdown().await;

        let session = viewer.await.unwrap();
        assert_eq!(session.received, 10);
        for (i, text) in session.surface.texts().into_iter().enumerate() {
            let stat: Stat = serde_json::from_str(text).unwrap();
            assert_eq!(stat, Stat::info(format!("early {i}"), Some(true)));
        }
    });
}

#[test]
fn meta_reporter_feeds_memory_and_master_alike() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let stack = TestStack::start().await;
        let viewer = tokio::spawn(
            Viewer::with_endpoint(stack.endpoint().to_string(), DisplayList::new()).run(),
        );

        let mut meta = MetaReporter::new();
        meta.add_reporter(Box::new(stack.slave()));
        meta.add_reporter(Box::new(MemoryReporter::new()));
        meta.start().await.unwrap();

        profile(&mut meta, "host", async {}).await.unwrap();
        profile(&mut meta, "join", async {}).await.unwrap();
        meta.stop().await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        stack.shutdown().await;

        let session = viewer.await.unwrap();
        assert_eq!(session.received, 4);
    });
}
