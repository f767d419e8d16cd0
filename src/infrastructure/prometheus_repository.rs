// Prometheus repository reached through the Kubernetes service proxy
use crate::application::metrics_repository::{MetricsError, MetricsRepository, RangeQuery};
use crate::domain::prometheus::QueryResponse;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct PrometheusRepository {
    client: reqwest::Client,
    api_base: String,
    bearer_token: Option<String>,
}

impl PrometheusRepository {
    pub fn new(api_base: String, bearer_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    fn build_query_url(&self, prefix: &str, query: &RangeQuery) -> String {
        format!(
            "{}/api/v1/namespaces/{}/proxy/api/v1/query_range?query={}&start={}&end={}&step={}",
            self.api_base,
            prefix.trim_matches('/'),
            urlencoding::encode(&query.query),
            query.start,
            query.end,
            query.step_secs
        )
    }
}

#[async_trait]
impl MetricsRepository for PrometheusRepository {
    async fn query_range(
        &self,
        prefix: &str,
        query: &RangeQuery,
    ) -> Result<QueryResponse, MetricsError> {
        let url = self.build_query_url(prefix, query);
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        match (status.is_success(), serde_json::from_str::<QueryResponse>(&body)) {
            (true, Ok(parsed)) => Ok(parsed),
            // bad queries come back as 400/422 with an in-band error body
            (false, Ok(parsed)) if parsed.failure().is_some() => Ok(parsed),
            (false, _) => {
                tracing::error!("Prometheus at {} returned {}", prefix, status);
                Err(MetricsError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            (true, Err(e)) => {
                tracing::warn!("Unreadable Prometheus response from {}: {}", prefix, e);
                Ok(QueryResponse::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, StatusCode, Uri};
    use axum::Router;
    use std::sync::{Arc, Mutex};

    /// What the local Prometheus stand-in saw: path and query, Authorization header.
    type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

    /// Serve `body` with `status` for every request on an ephemeral local port.
    async fn serve_canned(status: u16, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorder.lock().unwrap().push((uri.to_string(), auth));
                (StatusCode::from_u16(status).unwrap(), body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    fn query() -> RangeQuery {
        RangeQuery {
            query: "sum(keda_scaler_metrics_value{scaledObject=\"worker\"})".to_string(),
            start: 1_699_996_400,
            end: 1_700_000_000,
            step_secs: 14,
        }
    }

    #[test]
    fn test_build_query_url() {
        let repo = PrometheusRepository::new("http://127.0.0.1:8001/".to_string(), None);
        let url = repo.build_query_url("monitoring/services/prometheus:9090", &query());

        assert_eq!(
            url,
            "http://127.0.0.1:8001/api/v1/namespaces/monitoring/services/prometheus:9090/proxy/api/v1/query_range\
             ?query=sum%28keda_scaler_metrics_value%7BscaledObject%3D%22worker%22%7D%29\
             &start=1699996400&end=1700000000&step=14"
        );
    }

    #[test]
    fn test_prefix_slashes_are_trimmed() {
        let repo = PrometheusRepository::new("https://k8s.example".to_string(), Some("t".to_string()));
        let url = repo.build_query_url("/monitoring/services/prometheus/", &query());
        assert!(url.starts_with("https://k8s.example/api/v1/namespaces/monitoring/services/prometheus/proxy/"));
    }

    #[tokio::test]
    async fn test_query_range_success() {
        let (base, seen) = serve_canned(
            200,
            r#"{"status":"success","data":{"result":[{"metric":{},"values":[[1700000000,"3.5"]]}]}}"#,
        )
        .await;
        let repo = PrometheusRepository::new(base, Some("secret".to_string()));

        let response = repo.query_range("monitoring/services/prometheus", &query()).await.unwrap();
        assert_eq!(response.first_series().unwrap().values.len(), 1);

        let seen = seen.lock().unwrap();
        assert!(seen[0].0.starts_with("/api/v1/namespaces/monitoring/services/prometheus/proxy/api/v1/query_range?"));
        assert_eq!(seen[0].1.as_deref(), Some("Bearer secret"));
    }

    #[tokio::test]
    async fn test_query_range_error_status() {
        let (base, _) = serve_canned(503, "upstream connect error").await;
        let repo = PrometheusRepository::new(base, None);

        match repo.query_range("monitoring/services/prometheus", &query()).await {
            Err(MetricsError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream connect error");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_range_in_band_error() {
        let (base, _) = serve_canned(
            400,
            r#"{"status":"error","errorType":"bad_data","error":"parse error at char 5"}"#,
        )
        .await;
        let repo = PrometheusRepository::new(base, None);

        let response = repo.query_range("monitoring/services/prometheus", &query()).await.unwrap();
        assert_eq!(
            response.failure().as_deref(),
            Some("bad_data: parse error at char 5")
        );
        assert!(response.first_series().is_none());
    }

    #[tokio::test]
    async fn test_query_range_unreadable_body() {
        let (base, _) = serve_canned(200, "<html>not prometheus</html>").await;
        let repo = PrometheusRepository::new(base, None);

        let response = repo.query_range("monitoring/services/prometheus", &query()).await.unwrap();
        assert!(response.first_series().is_none());
        assert!(crate::domain::prometheus::normalize(&response).is_empty());
    }
}
