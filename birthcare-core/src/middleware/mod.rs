pub mod metrics;
pub mod tracing;

pub use metrics::{init_http_metrics, metrics_middleware};
pub use tracing::{REQUEST_ID_HEADER, request_id_middleware};
