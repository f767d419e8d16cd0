// Chart data domain models
use crate::domain::interval::{Interval, TimeWindow};
use crate::domain::resolution::Resolution;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    /// UNIX seconds as reported by Prometheus.
    pub timestamp: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(timestamp: f64, y: f64) -> Self {
        Self { timestamp, y }
    }
}

/// Labels attached to a KEDA scaler metric series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerMetadata {
    pub metric: Option<String>,
    pub trigger_index: Option<String>,
    pub scaler: Option<String>,
}

impl TriggerMetadata {
    pub fn is_empty(&self) -> bool {
        self.metric.is_none() && self.trigger_index.is_none() && self.scaler.is_none()
    }
}

/// How plotted values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueUnit {
    #[default]
    Plain,
    Bytes,
}

impl ValueUnit {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueUnit::Plain => value.to_string(),
            ValueUnit::Bytes => format_bytes(value),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotData {
    pub name: String,
    pub points: Vec<DataPoint>,
    /// One label per point, empty where the tick is suppressed.
    pub tick_labels: Vec<String>,
    /// Most recent value, formatted for display.
    pub latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TriggerMetadata>,
}

impl PlotData {
    pub fn new(
        name: String,
        points: Vec<DataPoint>,
        tick_labels: Vec<String>,
        unit: ValueUnit,
        metadata: Option<TriggerMetadata>,
    ) -> Self {
        let latest = points.last().map(|p| unit.format(p.y));
        Self {
            name,
            points,
            tick_labels,
            latest,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub cluster: String,
    pub query: String,
    pub interval: Interval,
    pub resolution: Resolution,
    pub window: TimeWindow,
    pub step_ms: i64,
    pub plots: Vec<PlotData>,
}

impl ChartData {
    pub fn new(
        cluster: String,
        query: String,
        interval: Interval,
        resolution: Resolution,
        window: TimeWindow,
        step_ms: i64,
        plots: Vec<PlotData>,
    ) -> Self {
        Self {
            cluster,
            query,
            interval,
            resolution,
            window,
            step_ms,
            plots,
        }
    }
}

/// Human readable byte count, base 1024 with two decimals (`1.18MB`).
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut scaled = bytes;
    let mut unit = 0;
    while scaled.is_finite() && scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    format!("{:.2}{}", scaled, UNITS[unit])
}
