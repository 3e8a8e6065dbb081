use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn empty_config_uses_defaults() {
    let cfg: RemoteviewConfig = "".parse().unwrap();

    assert_eq!(cfg.master.host, "0.0.0.0");
    assert_eq!(cfg.master.port, 8081);
    assert_eq!(cfg.master.buffer_size, 1024);
    assert_eq!(cfg.master.max_line_bytes, 1024 * 1024);
    assert_eq!(cfg.feed.listen, "127.0.0.1:8082");
    assert_eq!(cfg.feed.handshake_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.slave.host, "127.0.0.1");
    assert_eq!(cfg.slave.port, 8081);
    assert_eq!(cfg.slave.retries, None);
    assert_eq!(cfg.slave.retry_delay_ms, 1000);
}

#[test]
fn sections_override_defaults() {
    let cfg: RemoteviewConfig = r#"
        [master]
        port = 9000
        buffer_size = 64
        max_line_bytes = 4096

        [slave]
        port = 9000
        retries = 3
        retry_delay_ms = 250
    "#
    .parse()
    .unwrap();

    let master = cfg.master.master_config();
    assert_eq!(master.port, 9000);
    assert_eq!(master.buffer_size, 64);
    assert_eq!(master.max_line_bytes, 4096);

    let slave = cfg.slave.slave_config();
    assert_eq!(slave.retries, Some(3));
    assert_eq!(slave.retry_delay, Duration::from_millis(250));
}

#[test]
fn zero_buffer_size_is_rejected() {
    let err = "[master]\nbuffer_size = 0".parse::<RemoteviewConfig>().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { field: "master.buffer_size", .. }), "{err}");
}

#[test]
fn zero_max_line_bytes_is_rejected() {
    let err = "[master]\nmax_line_bytes = 0".parse::<RemoteviewConfig>().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { field: "master.max_line_bytes", .. }), "{err}");
}

#[test]
fn zero_handshake_timeout_is_rejected() {
    let err = "[feed]\nhandshake_timeout_ms = 0".parse::<RemoteviewConfig>().unwrap_err();

    assert!(
        matches!(err, ConfigError::Invalid { field: "feed.handshake_timeout_ms", .. }),
        "{err}"
    );
}

#[test]
fn feed_listen_must_be_socket_address() {
    let err = "[feed]\nlisten = \"localhost\"".parse::<RemoteviewConfig>().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { field: "feed.listen", .. }), "{err}");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = "[master]\nprot = 1".parse::<RemoteviewConfig>().unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[test]
fn from_file_reports_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = RemoteviewConfig::from_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn from_file_reads_and_validates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("remoteview.toml");
    fs::write(&path, "[feed]\nlisten = \"127.0.0.1:9999\"\n").unwrap();

    let cfg = RemoteviewConfig::load(Some(path.as_path())).unwrap();

    assert_eq!(cfg.feed.listen, "127.0.0.1:9999");
}

#[test]
fn load_without_path_is_default() {
    let cfg = RemoteviewConfig::load(None).unwrap();

    assert_eq!(cfg.feed.listen, "127.0.0.1:8082");
}
