use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::workflows::admissions::router::{exam_stage_handler, ExamStageRequest};

fn post_json(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn exam_stage_route_returns_enriched_rows() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/admissions/exam-stage",
            &json!({
                "sheets": [sheet_payload(false)],
                "preselected": [72000002],
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["stage"], "exam");
    assert_eq!(payload["applicants"], 2);
    assert!(payload["batch_id"].as_str().unwrap_or_default().starts_with("batch-"));

    let rows = payload["rows"].as_array().expect("rows");
    assert_eq!(rows[0]["per_num_doc"], "72000001");
    assert_eq!(rows[0]["pos_codigo"], "00001234");
    assert_eq!(rows[0]["eligibility_status"], "ELIGIBLE_FOR_INTERVIEW");
    assert_eq!(rows[1]["eligibility_status"], "NOT_APPROVED");

    let summary = &payload["summaries"][0];
    assert_eq!(summary["program"], LAW);
    assert_eq!(summary["eligible"], 1);
    assert_eq!(summary["not_approved"], 1);
    assert!(summary.get("admitted").is_none());
}

#[tokio::test]
async fn interview_stage_route_completes_registered_batch() {
    let (service, _) = build_service();
    let service = Arc::new(service);

    let exam = crate::workflows::admissions::admission_router(service.clone())
        .oneshot(post_json(
            "/api/v1/admissions/exam-stage",
            &json!({ "sheets": [sheet_payload(false)], "preselected": ["72000002"] }),
        ))
        .await
        .expect("route executes");
    let batch_id = read_json_body(exam).await["batch_id"].clone();

    let response = crate::workflows::admissions::admission_router(service)
        .oneshot(post_json(
            "/api/v1/admissions/interview-stage",
            &json!({ "batch_id": batch_id, "sheets": [sheet_payload(true)] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["stage"], "interview");

    let rows = payload["rows"].as_array().expect("rows");
    assert_eq!(rows[0]["final_status"], "ADMITTED");
    assert_eq!(rows[0]["final_merit_rank"], 1);
    assert_eq!(rows[1]["final_status"], "NOT_APPROVED");
    assert_eq!(rows[1]["preselection_outcome"], "PRESELECTED");
    assert_eq!(rows[1]["final_score"], Value::Null);
    assert_eq!(payload["summaries"][0]["admitted"], 1);
}

#[tokio::test]
async fn interview_stage_route_requires_exam_stage() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/admissions/interview-stage",
            &json!({ "batch_id": "batch-missing", "sheets": [sheet_payload(true)] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["category"], "referential");
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("stage 1 must be processed before stage 2"));
}

#[tokio::test]
async fn exam_stage_handler_rejects_missing_columns() {
    let (service, _) = build_service();
    let request: ExamStageRequest = serde_json::from_value(json!({
        "sheets": [{ "name": PERIOD, "rows": [{ "per_num_doc": 1, "modalidad": ORDINARY }] }],
    }))
    .expect("request deserializes");

    let response = exam_stage_handler(State(Arc::new(service)), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["category"], "schema");
}

#[tokio::test]
async fn batch_route_reports_registration_and_unknown_ids() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let outcome = service
        .exam_stage(&[sheet(PERIOD, scenario_b_records())], preselection(&["71000000", "71000001"]))
        .expect("exam stage succeeds");

    let found = crate::workflows::admissions::admission_router(service.clone())
        .oneshot(
            axum::http::Request::get(format!(
                "/api/v1/admissions/batches/{}",
                outcome.batch.batch_id
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(found.status(), StatusCode::OK);
    let payload = read_json_body(found).await;
    assert_eq!(payload["preselected"], 2);
    assert_eq!(payload["applicants"], 4);

    let missing = crate::workflows::admissions::admission_router(service)
        .oneshot(
            axum::http::Request::get("/api/v1/admissions/batches/batch-nope")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
