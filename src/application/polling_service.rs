// Polling service - periodically rebuilds a chart while someone is watching it
use crate::application::chart_service::{ChartRequest, ChartService};
use crate::application::metrics_repository::MetricsError;
use crate::domain::telemetry::ChartData;
use std::time::Duration;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 4;

#[derive(Clone)]
pub struct PollingService {
    chart_service: ChartService,
    refresh: Duration,
}

impl PollingService {
    pub fn new(chart_service: ChartService, refresh: Duration) -> Self {
        Self {
            chart_service,
            refresh,
        }
    }

    /// Emit a fresh chart immediately and then every refresh period.
    /// Polling stops once the receiver is dropped. A cluster that cannot be
    /// charted is rejected before anything is spawned.
    pub fn watch(&self, request: ChartRequest) -> Result<mpsc::Receiver<ChartData>, MetricsError> {
        self.chart_service.prometheus_prefix(&request.cluster)?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let chart_service = self.chart_service.clone();
        let refresh = self.refresh;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }

                let now = chrono::Utc::now().timestamp();
                match chart_service.scaler_chart(&request, now).await {
                    Ok(chart) => {
                        if tx.send(chart).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Refreshing chart for {} failed: {}", request.cluster, e);
                    }
                }
            }

            tracing::debug!("Stopped polling {} for {}", request.query, request.cluster);
        });

        Ok(rx)
    }
}
