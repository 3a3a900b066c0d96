mod detection_listener;

pub use detection_listener::{DEFAULT_WORKERS, DetectionWorkerPool};
