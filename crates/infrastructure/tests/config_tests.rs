use infrastructure::config::ServerConfig;
use std::fs;

fn write_config(run_id: &str, contents: &str) -> std::path::PathBuf {
    let config_dir = std::env::temp_dir().join(format!("yard_config_test_{}", run_id));
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("default.toml"), contents).unwrap();
    config_dir
}

#[test]
fn test_load_minimal_config_applies_defaults() {
    let dir = write_config(
        "minimal",
        r#"
        server_id = "yard-server-test"

        [database]
        url = "sqlite::memory:"
        "#,
    );

    let config = ServerConfig::load(dir.to_str().unwrap()).unwrap();
    assert_eq!(config.server_id, "yard-server-test");
    assert_eq!(config.database.url, "sqlite::memory:");
    assert!(config.database.run_migrations);
    assert_eq!(config.mqtt.host, "localhost");
    assert_eq!(config.mqtt.port, 1883);
    assert_eq!(config.mqtt.detections_topic, "yard/detections");
    assert_eq!(config.mqtt.events_topic, "yard/events");
    assert_eq!(config.ingest.workers, 4);
    assert_eq!(config.ingest.queue_capacity, 256);
}

#[test]
fn test_load_full_config_overrides_defaults() {
    let dir = write_config(
        "full",
        r#"
        server_id = "yard-server-2"

        [database]
        url = "postgres://localhost/yard"
        run_migrations = false

        [mqtt]
        host = "broker.internal"
        port = 8883
        detections_topic = "site7/detections"
        events_topic = "site7/events"

        [ingest]
        workers = 8
        queue_capacity = 1024
        "#,
    );

    let config = ServerConfig::load(dir.to_str().unwrap()).unwrap();
    assert!(!config.database.run_migrations);
    assert_eq!(config.mqtt.host, "broker.internal");
    assert_eq!(config.mqtt.port, 8883);
    assert_eq!(config.ingest.workers, 8);
    assert_eq!(config.ingest.queue_capacity, 1024);
}

#[test]
fn test_load_fails_without_default_file() {
    let dir = std::env::temp_dir().join("yard_config_test_missing");
    fs::create_dir_all(&dir).unwrap();

    assert!(ServerConfig::load(dir.to_str().unwrap()).is_err());
}
