// Domain layer - intervals, resolutions, tick labels and chart data
pub mod interval;
pub mod prometheus;
pub mod resolution;
pub mod telemetry;
pub mod tick;
