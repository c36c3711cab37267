use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::workflows::import::{CellValue, PreselectionImporter, SheetImporter, SheetPayload};

use super::domain::ApplicantSheet;
use super::pipeline::AdmissionResults;
use super::report::{summarize, ReportTable};
use super::repository::{BatchId, PreselectionRepository, RepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};
use super::validation::ValidationError;

/// Router builder exposing the two admission stages and batch lookup.
pub fn admission_router<R>(service: Arc<AdmissionService<R>>) -> Router
where
    R: PreselectionRepository + 'static,
{
    Router::new()
        .route("/api/v1/admissions/exam-stage", post(exam_stage_handler::<R>))
        .route(
            "/api/v1/admissions/interview-stage",
            post(interview_stage_handler::<R>),
        )
        .route(
            "/api/v1/admissions/batches/:batch_id",
            get(batch_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ExamStageRequest {
    pub sheets: Vec<SheetPayload>,
    #[serde(default)]
    pub preselected: Vec<CellValue>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewStageRequest {
    pub batch_id: BatchId,
    pub sheets: Vec<SheetPayload>,
}

pub(crate) async fn exam_stage_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    axum::Json(request): axum::Json<ExamStageRequest>,
) -> Response
where
    R: PreselectionRepository + 'static,
{
    let sheets = match bind_sheets(request.sheets) {
        Ok(sheets) => sheets,
        Err(error) => return validation_response(&error),
    };
    let preselected = PreselectionImporter::from_cells(&request.preselected);

    match service.exam_stage(&sheets, preselected) {
        Ok(outcome) => {
            let payload = results_payload(&outcome.batch.batch_id, &outcome.results);
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(&error),
    }
}

pub(crate) async fn interview_stage_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    axum::Json(request): axum::Json<InterviewStageRequest>,
) -> Response
where
    R: PreselectionRepository + 'static,
{
    let sheets = match bind_sheets(request.sheets) {
        Ok(sheets) => sheets,
        Err(error) => return validation_response(&error),
    };

    match service.interview_stage(&request.batch_id, &sheets) {
        Ok(results) => {
            let payload = results_payload(&request.batch_id, &results);
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_error_response(&error),
    }
}

pub(crate) async fn batch_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(batch_id): Path<String>,
) -> Response
where
    R: PreselectionRepository + 'static,
{
    let id = BatchId(batch_id);
    match service.batch(&id) {
        Ok(batch) => (StatusCode::OK, axum::Json(batch.view())).into_response(),
        Err(AdmissionServiceError::StageOneRequired { .. }) => {
            let payload = json!({
                "error": "batch not found",
                "batch_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => service_error_response(&other),
    }
}

fn bind_sheets(payloads: Vec<SheetPayload>) -> Result<Vec<ApplicantSheet>, ValidationError> {
    payloads
        .into_iter()
        .map(SheetImporter::from_payload)
        .collect()
}

fn results_payload(batch_id: &BatchId, results: &AdmissionResults) -> serde_json::Value {
    let table = ReportTable::from_results(results);
    json!({
        "batch_id": batch_id,
        "stage": results.stage,
        "applicants": table.len(),
        "summaries": summarize(results),
        "columns": table.columns,
        "rows": table.records(),
    })
}

fn validation_response(error: &ValidationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "category": error.category(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn service_error_response(error: &AdmissionServiceError) -> Response {
    let status = match error {
        AdmissionServiceError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionServiceError::StageOneRequired { .. } => StatusCode::PRECONDITION_FAILED,
        AdmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AdmissionServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
        "category": error.category(),
    });
    (status, axum::Json(payload)).into_response()
}
