// Chart service - builds chart-ready KEDA scaler metric series
use crate::application::metrics_repository::{MetricsError, MetricsRepository, RangeQuery};
use crate::domain::interval::{resolve, Interval};
use crate::domain::prometheus::{normalize, SeriesResult};
use crate::domain::resolution::{step, Resolution};
use crate::domain::telemetry::{ChartData, PlotData, TriggerMetadata, ValueUnit};
use crate::domain::tick::{TickFormatter, TickZone};
use crate::infrastructure::config::ClustersConfig;
use serde::Serialize;
use std::sync::Arc;

const TRIGGER_PLOT_NAME: &str = "Trigger value";

/// What to chart. Interval and resolution fall back to the cluster defaults.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub cluster: String,
    pub query: String,
    pub interval: Option<Interval>,
    pub resolution: Option<Resolution>,
    pub unit: ValueUnit,
}

/// Effective per-cluster chart settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub cluster: String,
    pub is_metrics_enabled: bool,
    pub prometheus_prefix: Option<String>,
    pub default_timespan: Interval,
    pub default_graph_resolution: Resolution,
}

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn MetricsRepository>,
    clusters: ClustersConfig,
    tick_zone: TickZone,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn MetricsRepository>,
        clusters: ClustersConfig,
        tick_zone: TickZone,
    ) -> Self {
        Self {
            repository,
            clusters,
            tick_zone,
        }
    }

    pub fn settings(&self, cluster: &str) -> ClusterView {
        ClusterView {
            cluster: cluster.to_string(),
            is_metrics_enabled: self.clusters.is_metrics_enabled(cluster),
            prometheus_prefix: self.clusters.prometheus_prefix(cluster),
            default_timespan: self.clusters.interval(cluster),
            default_graph_resolution: self.clusters.graph_resolution(cluster),
        }
    }

    /// Proxy prefix of the cluster's Prometheus, if charts can be drawn for it at all.
    pub fn prometheus_prefix(&self, cluster: &str) -> Result<String, MetricsError> {
        if !self.clusters.is_metrics_enabled(cluster) {
            return Err(MetricsError::NotEnabled(cluster.to_string()));
        }
        self.clusters
            .prometheus_prefix(cluster)
            .ok_or_else(|| MetricsError::NoPrometheus(cluster.to_string()))
    }

    /// Fetch and shape the trigger value series of a scaler for the window ending at `now`.
    pub async fn scaler_chart(
        &self,
        request: &ChartRequest,
        now: i64,
    ) -> Result<ChartData, MetricsError> {
        let cluster = request.cluster.as_str();
        let prefix = self.prometheus_prefix(cluster)?;

        let interval = request
            .interval
            .clone()
            .unwrap_or_else(|| self.clusters.interval(cluster));
        let resolution = request
            .resolution
            .clone()
            .unwrap_or_else(|| self.clusters.graph_resolution(cluster));

        let window = resolve(&interval, now);
        let step_ms = step(&resolution, window.range_ms());
        let range_query = RangeQuery {
            query: request.query.clone(),
            start: window.from,
            end: window.to,
            step_secs: step_ms / 1000,
        };

        tracing::debug!(
            "Querying {} on {} for {} ({}..{}, step {}ms)",
            request.query,
            prefix,
            interval,
            window.from,
            window.to,
            step_ms
        );

        let response = self.repository.query_range(&prefix, &range_query).await?;
        if let Some(failure) = response.failure() {
            return Err(MetricsError::Query(failure));
        }

        let points = normalize(&response);
        let tick_labels = TickFormatter::label_all(
            &interval,
            self.tick_zone,
            points.iter().map(|p| p.timestamp),
        );
        let metadata = response
            .first_series()
            .map(trigger_metadata)
            .filter(|m| !m.is_empty());

        tracing::debug!("Chart for {} has {} points", cluster, points.len());

        let plot = PlotData::new(
            TRIGGER_PLOT_NAME.to_string(),
            points,
            tick_labels,
            request.unit,
            metadata,
        );
        Ok(ChartData::new(
            cluster.to_string(),
            request.query.clone(),
            interval,
            resolution,
            window,
            step_ms,
            vec![plot],
        ))
    }
}

fn trigger_metadata(series: &SeriesResult) -> TriggerMetadata {
    TriggerMetadata {
        metric: series.metric.get("metric").cloned(),
        trigger_index: series.metric.get("triggerIndex").cloned(),
        scaler: series.metric.get("scaler").cloned(),
    }
}
