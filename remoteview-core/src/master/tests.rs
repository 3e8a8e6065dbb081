use super::*;
use crate::reporting::{Reporter, SlaveConfig, SlaveReporter, info};
use crate::stat::Stat;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

async fn next_line(rx: &mut LineReceiver) -> String {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a forwarded line")
        .expect("line channel closed")
}

#[tokio::test]
async fn start_binds_ephemeral_port() {
    let (tx, _rx) = line_channel();
    let mut master = MasterReporter::new(MasterConfig::new("127.0.0.1", 0));

    let addr = master.start(tx).await.unwrap();

    assert!(master.started());
    assert_ne!(master.port(), 0);
    assert_eq!(master.port(), addr.port());
    assert_eq!(master.host(), "127.0.0.1");

    master.stop().await;
    assert!(!master.started());
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let (tx, _rx) = line_channel();
    let mut first = MasterReporter::new(MasterConfig::new("127.0.0.1", 0));
    let addr = first.start(tx.clone()).await.unwrap();

    let mut second = MasterReporter::new(MasterConfig::new("127.0.0.1", addr.port()));
    let err = second.start(tx).await.unwrap_err();

    assert!(matches!(err, ReportError::Bind { .. }), "{err}");
}

#[tokio::test]
async fn forwards_lines_split_across_reads() {
    let (tx, mut rx) = line_channel();
    let mut config = MasterConfig::new("127.0.0.1", 0);
    config.buffer_size = 4;
    let mut master = MasterReporter::new(config);
    let addr = master.start(tx).await.unwrap();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"first line\nsecond").await.unwrap();
    stream.write_all(b" line\n").await.unwrap();

    assert_eq!(next_line(&mut rx).await, "first line");
    assert_eq!(next_line(&mut rx).await, "second line");
    assert_eq!(master.slaves().len(), 1);
}

#[tokio::test]
async fn slave_stats_arrive_in_order() {
    let (tx, mut rx) = line_channel();
    let mut master = MasterReporter::new(MasterConfig::new("127.0.0.1", 0));
    let addr = master.start(tx).await.unwrap();

    let mut slave = SlaveReporter::new(SlaveConfig::new("127.0.0.1", addr.port()));
    slave.start().await.unwrap();
    for i in 0..5 {
        info(&mut slave, format!("message {i}"), None).await.unwrap();
    }
    slave.stop().await.unwrap();

    for i in 0..5 {
        let stat: Stat = serde_json::from_str(&next_line(&mut rx).await).unwrap();
        assert_eq!(stat, Stat::info(format!("message {i}"), None));
    }
}

#[tokio::test]
async fn slave_with_overlong_line_is_disconnected() {
    let (tx, mut rx) = line_channel();
    let mut config = MasterConfig::new("127.0.0.1", 0);
    config.buffer_size = 16;
    config.max_line_bytes = 32;
    let mut master = MasterReporter::new(config);
    let addr = master.start(tx).await.unwrap();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"fits\n").await.unwrap();
    stream.write_all(&[b'x'; 64]).await.unwrap();

    assert_eq!(next_line(&mut rx).await, "fits");

    // The master hangs up; our read ends instead of waiting forever.
    let mut buf = [0u8; 8];
    let read = timeout(Duration::from_secs(2), stream.read(&mut buf))
        .await
        .expect("master kept the connection open");
    assert!(matches!(read, Ok(0) | Err(_)));
    assert!(rx.try_recv().is_err());
}
