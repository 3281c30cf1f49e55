//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("static pattern compiles"));

const MAX_PATH_LABEL_LEN: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("orders_api_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record an authentication event such as a login or a gate rejection
///
/// `outcome` is `"success"` or an error kind like `"token_expired"`.
pub fn record_auth_event(event: &'static str, outcome: &'static str) {
    counter!("auth_events_total", "event" => event, "outcome" => outcome).increment(1);
}

/// Sanitize URL path for metric labels (replace ids, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let mut sanitized = path.to_string();

    // Overlapping matches need a second pass: "/1/2" only replaces "/1/" first.
    while NUMERIC_SEGMENT.is_match(&sanitized) {
        sanitized = NUMERIC_SEGMENT
            .replace_all(&sanitized, "/{id}$1")
            .into_owned();
    }

    sanitized.chars().take(MAX_PATH_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/users/123/orders"), "/users/{id}/orders");
        assert_eq!(sanitize_path("/users/7"), "/users/{id}");
    }

    #[test]
    fn test_sanitize_path_nested_ids() {
        assert_eq!(sanitize_path("/users/1/orders/2"), "/users/{id}/orders/{id}");
        assert_eq!(sanitize_path("/users/1/2"), "/users/{id}/{id}");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
        assert_eq!(sanitize_path("/users/abc1"), "/users/abc1");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert_eq!(sanitize_path(path).chars().count(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_http_request("GET", "/users/1", 200, Duration::from_millis(3));
        record_auth_event("login", "success");
    }
}
