use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_detections_topic")]
    pub detections_topic: String,
    #[serde(default = "default_events_topic")]
    pub events_topic: String,
}

fn default_detections_topic() -> String {
    "yard/detections".to_string()
}

fn default_events_topic() -> String {
    "yard/events".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub server_id: String,
    pub database: DatabaseConfig,
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl ServerConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server_id", "yard-server-1")?
            .set_default("mqtt.host", "localhost")?
            .set_default("mqtt.port", 1883)?
            // Base config file, required so the server never starts on
            // implicit defaults alone
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(true))
            // Environment-specific overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. YARD__DATABASE__URL=postgres://...)
            .add_source(Environment::with_prefix("YARD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
