use crate::domain::interval::Interval;
use crate::domain::resolution::Resolution;
use crate::domain::tick::TickZone;
use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "KEDA_CHARTS";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Kubernetes API server (or `kubectl proxy`) the service proxy is reached through.
    pub api_base: String,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub tick_zone: TickZone,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_refresh_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClustersConfig {
    #[serde(default)]
    pub clusters: HashMap<String, ClusterSettings>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClusterSettings {
    #[serde(default)]
    pub is_metrics_enabled: bool,
    /// `namespace/service`, optionally with `:port` on the service.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub default_timespan: Option<Interval>,
    #[serde(default)]
    pub default_graph_resolution: Option<Resolution>,
}

impl ClusterSettings {
    /// Service proxy prefix (`namespace/services/name[:port]`) for the configured address.
    pub fn prometheus_prefix(&self) -> Option<String> {
        let address = self.address.as_deref()?.trim();
        let (namespace, service) = address.split_once('/')?;
        let service = service.split('/').next().unwrap_or_default();

        if namespace.is_empty() || service.is_empty() {
            return None;
        }
        Some(format!("{}/services/{}", namespace, service))
    }
}

impl ClustersConfig {
    pub fn cluster(&self, cluster: &str) -> Option<&ClusterSettings> {
        if cluster.is_empty() {
            return None;
        }
        self.clusters.get(cluster)
    }

    pub fn is_metrics_enabled(&self, cluster: &str) -> bool {
        self.cluster(cluster)
            .map(|c| c.is_metrics_enabled)
            .unwrap_or(false)
    }

    pub fn interval(&self, cluster: &str) -> Interval {
        self.cluster(cluster)
            .and_then(|c| c.default_timespan.clone())
            .unwrap_or(Interval::TwentyFourHours)
    }

    pub fn graph_resolution(&self, cluster: &str) -> Resolution {
        self.cluster(cluster)
            .and_then(|c| c.default_graph_resolution.clone())
            .unwrap_or(Resolution::Medium)
    }

    pub fn prometheus_prefix(&self, cluster: &str) -> Option<String> {
        self.cluster(cluster)?.prometheus_prefix()
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_clusters_config() -> anyhow::Result<ClustersConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/clusters").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolution::FixedStep;
    use config::{Config, File, FileFormat};

    fn clusters(toml: &str) -> ClustersConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    const CLUSTERS: &str = r#"
        [clusters.prod]
        is_metrics_enabled = true
        address = "monitoring/prometheus-server:9090"
        default_timespan = "lastweek"
        default_graph_resolution = "high"

        [clusters.staging]
        address = "monitoring"

        [clusters.edge]
        is_metrics_enabled = true
        address = "obs/prom"
        default_graph_resolution = "5m"
    "#;

    #[test]
    fn test_cluster_defaults() {
        let config = clusters(CLUSTERS);

        assert!(config.is_metrics_enabled("prod"));
        assert_eq!(config.interval("prod"), Interval::LastWeek);
        assert_eq!(config.graph_resolution("prod"), Resolution::High);

        assert!(!config.is_metrics_enabled("staging"));
        assert_eq!(config.interval("staging"), Interval::TwentyFourHours);
        assert_eq!(config.graph_resolution("staging"), Resolution::Medium);

        assert_eq!(
            config.graph_resolution("edge"),
            Resolution::Fixed(FixedStep::FiveMinutes)
        );
        assert_eq!(config.graph_resolution("edge").step_ms(86_400_000), 300_000);

        assert!(!config.is_metrics_enabled("unknown"));
        assert!(!config.is_metrics_enabled(""));
        assert_eq!(config.interval("unknown"), Interval::TwentyFourHours);
    }

    #[test]
    fn test_prometheus_prefix() {
        let config = clusters(CLUSTERS);

        assert_eq!(
            config.prometheus_prefix("prod").as_deref(),
            Some("monitoring/services/prometheus-server:9090")
        );
        assert_eq!(config.prometheus_prefix("staging"), None);
        assert_eq!(config.prometheus_prefix("unknown"), None);
        assert_eq!(ClusterSettings::default().prometheus_prefix(), None);
    }

    #[test]
    fn test_server_settings_defaults() {
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(
                "[server]\napi_base = \"http://127.0.0.1:8001\"\ntick_zone = \"utc\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.server.refresh_secs, 10);
        assert_eq!(config.server.tick_zone, TickZone::Utc);
        assert!(config.server.bearer_token.is_none());
    }
}
