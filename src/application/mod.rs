// Application layer - chart use cases
pub mod chart_service;
pub mod metrics_repository;
pub mod polling_service;
