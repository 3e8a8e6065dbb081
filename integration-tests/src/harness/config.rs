use remoteview_core::config::RemoteviewConfig;

/// Config with every listener on localhost and freshly allocated ports.
pub fn test_config() -> RemoteviewConfig {
    let master_port = free_port();
    let feed_port = free_port();

    let mut cfg = RemoteviewConfig::default();
    cfg.master.host = "127.0.0.1".to_string();
    cfg.master.port = master_port;
    cfg.feed.listen = format!("127.0.0.1:{feed_port}");
    cfg.slave.host = "127.0.0.1".to_string();
    cfg.slave.port = master_port;
    cfg.slave.retries = Some(20);
    cfg.slave.retry_delay_ms = 25;

    cfg.validate().expect("test config must be valid");
    cfg
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
