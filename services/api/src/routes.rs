use crate::infra::AppState;
use admission_ranker::workflows::admissions::{
    admission_router, AdmissionService, PreselectionRepository, ScoringConfig,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_admission_routes<R>(service: Arc<AdmissionService<R>>) -> axum::Router
where
    R: PreselectionRepository + 'static,
{
    admission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/admissions/policy",
            axum::routing::get(policy_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scoring policy the service was started with.
pub(crate) async fn policy_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ScoringConfig> {
    Json(state.policy.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryPreselectionRepository;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            policy: Arc::new(ScoringConfig::default()),
        }
    }

    fn app(ready: bool) -> axum::Router {
        let service = AdmissionService::new(
            Arc::new(InMemoryPreselectionRepository::default()),
            ScoringConfig::default(),
        )
        .expect("default policy is valid");
        with_admission_routes(Arc::new(service)).layer(Extension(state(ready)))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                axum::http::Request::get(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let (status, payload) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");

        let (status, payload) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");
    }

    #[tokio::test]
    async fn policy_endpoint_exposes_scoring_defaults() {
        let (status, payload) = get(app(true), "/api/v1/admissions/policy").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["threshold_basis"], "composite_80");
        assert_eq!(payload["program_decile_weights"]["MEDICINA"], 0.6);
        assert_eq!(payload["missing_interview"], "reject");
    }
}
