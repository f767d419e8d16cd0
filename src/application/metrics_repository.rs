// Repository trait for Prometheus range queries
use crate::domain::prometheus::QueryResponse;
use async_trait::async_trait;

/// A range query against one Prometheus instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub query: String,
    pub start: i64,
    pub end: i64,
    pub step_secs: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("metrics are not enabled for cluster {0}")]
    NotEnabled(String),
    #[error("no Prometheus address configured for cluster {0}")]
    NoPrometheus(String),
    #[error("request to Prometheus failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Prometheus returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Prometheus query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Run `query` through the Prometheus reachable at `prefix`
    /// (`namespace/services/name[:port]`).
    async fn query_range(
        &self,
        prefix: &str,
        query: &RangeQuery,
    ) -> Result<QueryResponse, MetricsError>;
}
