use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use gradebook::academics::{academic_router, AcademicRepository, GradeReportService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_academic_routes<R>(service: Arc<GradeReportService<R>>) -> axum::Router
where
    R: AcademicRepository + 'static,
{
    academic_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAcademicRepository;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use gradebook::academics::AcademicDataset;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn router(ready: bool) -> axum::Router {
        let dataset: AcademicDataset = serde_json::from_str(
            r#"{
              "students": [{ "id": "s-1", "name": "Avery Chen" }],
              "terms": [{ "id": 1, "student_id": "s-1", "title": "Fall 2024",
                          "start_date": "2024-08-26", "end_date": "2024-12-13" }],
              "courses": [{ "id": 10, "term_id": 1, "title": "Data Structures" }],
              "grades": [{ "id": 1, "course_id": 10, "letter_grade": "A-", "credit_hours": 3 }]
            }"#,
        )
        .expect("dataset parses");
        let generated_at = Utc
            .with_ymd_and_hms(2025, 1, 6, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let repository =
            InMemoryAcademicRepository::from_dataset(dataset).expect("dataset seeds");
        let service = GradeReportService::new(Arc::new(repository), Arc::new(generated_at));

        with_academic_routes(Arc::new(service)).layer(Extension(app_state(ready)))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = router(false)
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = router(true)
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_prometheus_text() {
        let response = router(true)
            .oneshot(get("/metrics"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn academic_routes_are_mounted() {
        let response = router(true)
            .oneshot(get("/api/v1/students/s-1/terms/1/gpa"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["total_credit_hours"], 3);
        assert_eq!(payload["grade_count"], 1);
    }

    #[tokio::test]
    async fn transcript_csv_is_served_as_attachment() {
        let response = router(true)
            .oneshot(get("/api/v1/students/s-1/reports/transcript/csv"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let text = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(text.starts_with("Academic Transcript\nGenerated: 2025-01-06 12:00:00 UTC\n"));
        assert!(text.ends_with("Total Credit Hours,3,,Cumulative GPA,3.70\n"));
    }
}
