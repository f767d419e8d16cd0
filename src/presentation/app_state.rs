// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::polling_service::PollingService;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub polling_service: PollingService,
}
