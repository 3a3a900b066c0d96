use std::sync::Arc;

use anyhow::Result;
use application::messaging::DetectionWorkerPool;
use application::tracking::PositionResolver;
use infrastructure::config::ServerConfig;
use infrastructure::database::{
    SeaOrmBeaconRepository, SeaOrmOccupancyLedger, SeaOrmTagRepository, SeaOrmUnitOfWork,
    SeaOrmVehicleRepository,
};
use infrastructure::messaging::{MqttClient, MqttDetectionSource, MqttEventPublisher};
use migration::{Migrator, MigratorTrait};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Wire the ingest pipeline and run until the cancellation token fires.
///
/// MQTT detections flow through a bounded queue into the worker pool; the
/// resolver persists position updates through the SeaORM unit of work and
/// publishes zone-change events back over MQTT.
pub async fn run(config: ServerConfig, cancel: CancellationToken) -> Result<()> {
    let db = infrastructure::database::connect(&config.database.url).await?;

    if config.database.run_migrations {
        info!("Running database migrations");
        Migrator::up(&db, None).await?;
    }

    let mqtt_client = MqttClient::new(
        &config.mqtt.host,
        config.mqtt.port,
        &config.server_id,
    )
    .await?;

    let publisher = Arc::new(MqttEventPublisher::new(
        mqtt_client.clone(),
        config.mqtt.events_topic.clone(),
    ));

    let resolver = Arc::new(
        PositionResolver::new(
            Arc::new(SeaOrmTagRepository::new(db.clone())),
            Arc::new(SeaOrmVehicleRepository::new(db.clone())),
            Arc::new(SeaOrmBeaconRepository::new(db.clone())),
            Arc::new(SeaOrmOccupancyLedger::new(db.clone())),
            Arc::new(SeaOrmUnitOfWork::new(db.clone())),
        )
        .with_publisher(publisher),
    );

    let (tx, rx) = mpsc::channel(config.ingest.queue_capacity);

    let source = MqttDetectionSource::start(
        &mqtt_client,
        &config.mqtt.detections_topic,
        tx,
        cancel.clone(),
    )
    .await?;

    let pool = DetectionWorkerPool::spawn(resolver, rx, config.ingest.workers, cancel.clone());

    info!(server_id = %config.server_id, "Yard tracking server running");

    cancel.cancelled().await;
    info!("Shutting down");

    let _ = source.await;
    pool.join().await;
    Ok(())
}
