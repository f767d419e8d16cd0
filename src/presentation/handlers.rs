// HTTP request handlers
use crate::application::chart_service::ChartRequest;
use crate::application::metrics_repository::MetricsError;
use crate::domain::interval::Interval;
use crate::domain::resolution::Resolution;
use crate::domain::telemetry::ValueUnit;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ChartQuery {
    pub query: String,
    pub interval: Option<String>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub unit: ValueUnit,
}

impl ChartQuery {
    fn into_request(self, cluster: String) -> Result<ChartRequest, Response> {
        if self.query.trim().is_empty() {
            return Err(error_body(StatusCode::BAD_REQUEST, "query must not be empty"));
        }

        Ok(ChartRequest {
            cluster,
            query: self.query,
            interval: self.interval.map(Interval::from),
            resolution: self.resolution.map(Resolution::from),
            unit: self.unit,
        })
    }
}

#[derive(Serialize)]
pub struct IntervalOption {
    pub value: Interval,
    pub label: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Intervals offered in the time range menu
pub async fn list_intervals() -> Json<Vec<IntervalOption>> {
    let options = Interval::MENU
        .into_iter()
        .map(|(value, label)| IntervalOption { value, label })
        .collect();
    Json(options)
}

/// Effective chart settings for a cluster
pub async fn cluster_settings(
    Path(cluster): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.chart_service.settings(&cluster))
}

/// One snapshot of a KEDA scaler trigger chart
pub async fn scaler_chart(
    Path(cluster): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let request = match query.into_request(cluster) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let now = chrono::Utc::now().timestamp();
    match state.chart_service.scaler_chart(&request, now).await {
        Ok(chart) => Json(chart).into_response(),
        Err(e) => {
            tracing::warn!("Error building chart for {}: {}", request.cluster, e);
            metrics_error_response(&e)
        }
    }
}

/// Auto-refreshing KEDA scaler trigger chart, one JSON document per refresh
pub async fn stream_scaler_chart(
    Path(cluster): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let request = match query.into_request(cluster) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.polling_service.watch(request) {
        Ok(rx) => stream_from_receiver(rx).into_response(),
        Err(e) => {
            tracing::warn!("Refusing chart stream: {}", e);
            metrics_error_response(&e)
        }
    }
}

fn metrics_error_response(e: &MetricsError) -> Response {
    let status = match e {
        MetricsError::NotEnabled(_) | MetricsError::NoPrometheus(_) => StatusCode::NOT_FOUND,
        MetricsError::Query(_) => StatusCode::BAD_REQUEST,
        MetricsError::Transport(_) | MetricsError::Status { .. } => StatusCode::BAD_GATEWAY,
    };
    error_body(status, &e.to_string())
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
