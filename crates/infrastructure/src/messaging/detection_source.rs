use domain::telemetry::DetectionEvent;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::messaging::mqtt_client::MqttClient;

/// Bridges the detections MQTT topic onto the worker pool's queue.
///
/// Payloads that do not parse as a detection event are logged and dropped;
/// a malformed gateway message must never stall the pipeline. When the
/// queue is full the source awaits capacity, letting MQTT flow control
/// push back on the broker instead of buffering unboundedly here.
pub struct MqttDetectionSource;

impl MqttDetectionSource {
    pub async fn start(
        client: &MqttClient,
        topic: &str,
        tx: mpsc::Sender<DetectionEvent>,
        cancel: CancellationToken,
    ) -> anyhow::Result<JoinHandle<()>> {
        let mut messages = client.subscribe_messages();
        client.subscribe(topic).await?;
        info!(topic, "Listening for detection events");

        let topic = topic.to_string();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Detection source shutting down");
                        break;
                    }
                    msg = messages.recv() => match msg {
                        Ok(msg) if msg.topic == topic => {
                            match serde_json::from_slice::<DetectionEvent>(&msg.payload) {
                                Ok(event) => {
                                    debug!(tag_code = %event.tag_code, "Received detection");
                                    if tx.send(event).await.is_err() {
                                        info!("Detection queue closed; stopping source");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    warn!("Discarding malformed detection payload: {}", e);
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            // The broker has already acked these, so they
                            // will not be redelivered; the next sighting of
                            // each affected tag supersedes the lost event.
                            warn!("Detection source lagged; {} messages dropped", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("MQTT stream closed; stopping detection source");
                            break;
                        }
                    }
                }
            }
        });

        Ok(handle)
    }
}
