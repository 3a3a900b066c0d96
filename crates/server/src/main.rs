use anyhow::Result;
use clap::Parser;
use infrastructure::config::ServerConfig;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing default.toml and RUN_MODE overrides
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override the MQTT broker host
    #[arg(long)]
    mqtt_host: Option<String>,

    /// Override the MQTT broker port
    #[arg(long)]
    mqtt_port: Option<u16>,

    /// Override the number of ingest workers
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(&args.config_dir)?;

    if let Some(host) = args.mqtt_host {
        config.mqtt.host = host;
    }
    if let Some(port) = args.mqtt_port {
        config.mqtt.port = port;
    }
    if let Some(workers) = args.workers {
        config.ingest.workers = workers;
    }

    info!("Yard tracking server starting");

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            shutdown.cancel();
        }
    });

    server::run(config, cancel).await
}
