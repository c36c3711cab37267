use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::admissions::domain::{
    ApplicantRecord, ApplicantSheet, DocumentId, PreselectionList, SourceColumn,
};
use crate::workflows::admissions::repository::{
    BatchId, PreselectionBatch, PreselectionRepository, RepositoryError,
};
use crate::workflows::admissions::{
    admission_router, AdmissionPipeline, AdmissionService, ScoringConfig,
};

pub(super) const PERIOD: &str = "2024-I";
pub(super) const LAW: &str = "DERECHO";
pub(super) const MEDICINE: &str = "MEDICINA";
pub(super) const ORDINARY: &str = "ORDINARIO";

pub(super) const SOURCE_HEADERS: [&str; 6] = [
    "per_num_doc",
    "modalidad",
    "programa",
    "total_aptitud",
    "total_conocimiento",
    "nota_entre",
];

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn record(
    id: &str,
    modality: &str,
    program: &str,
    aptitude_raw: f64,
    knowledge_raw: f64,
) -> ApplicantRecord {
    ApplicantRecord {
        document_id: DocumentId::from(id),
        period: PERIOD.to_string(),
        modality: modality.to_string(),
        program: program.to_string(),
        position_code: None,
        aptitude_raw,
        knowledge_raw,
        interview_score: None,
        row: 0,
        source_columns: Vec::new(),
    }
}

/// Applicant whose composite_80 equals `80 * fraction`.
pub(super) fn scaled(id: &str, program: &str, fraction: f64) -> ApplicantRecord {
    record(id, ORDINARY, program, 60.0 * fraction, 70.0 * fraction)
}

pub(super) fn interviewed(mut record: ApplicantRecord, score: f64) -> ApplicantRecord {
    record.interview_score = Some(score);
    record
}

pub(super) fn sheet(name: &str, records: Vec<ApplicantRecord>) -> ApplicantSheet {
    let records = records
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            record.period = name.to_string();
            record.row = index + 1;
            record.source_columns = source_columns(&record);
            record
        })
        .collect();

    ApplicantSheet {
        name: name.to_string(),
        headers: SOURCE_HEADERS.iter().map(|h| h.to_string()).collect(),
        records,
    }
}

fn source_columns(record: &ApplicantRecord) -> Vec<SourceColumn> {
    let values = [
        record.document_id.to_string(),
        record.modality.clone(),
        record.program.clone(),
        record.aptitude_raw.to_string(),
        record.knowledge_raw.to_string(),
        record
            .interview_score
            .map(|score| score.to_string())
            .unwrap_or_default(),
    ];

    SOURCE_HEADERS
        .iter()
        .zip(values)
        .map(|(name, value)| SourceColumn {
            name: name.to_string(),
            value,
        })
        .collect()
}

/// Ten law applicants; the best composite_80 is 80 so the cutoff lands on 32.
pub(super) fn scenario_a_records() -> Vec<ApplicantRecord> {
    [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.45, 0.3, 0.2, 0.1]
        .iter()
        .enumerate()
        .map(|(index, fraction)| scaled(&format!("7000000{index}"), LAW, *fraction))
        .collect()
}

/// Four medicine applicants with composite_80 of 72, 56, 40 and 24.
pub(super) fn scenario_b_records() -> Vec<ApplicantRecord> {
    [0.9, 0.7, 0.5, 0.3]
        .iter()
        .enumerate()
        .map(|(index, fraction)| scaled(&format!("7100000{index}"), MEDICINE, *fraction))
        .collect()
}

pub(super) fn preselection(ids: &[&str]) -> PreselectionList {
    ids.iter().map(|id| DocumentId::from(*id)).collect()
}

pub(super) fn pipeline() -> AdmissionPipeline {
    AdmissionPipeline::new(ScoringConfig::default()).expect("default policy is valid")
}

pub(super) fn pipeline_with(config: ScoringConfig) -> AdmissionPipeline {
    AdmissionPipeline::new(config).expect("policy is valid")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) batches: Arc<Mutex<HashMap<BatchId, PreselectionBatch>>>,
}

impl PreselectionRepository for MemoryRepository {
    fn insert(&self, batch: PreselectionBatch) -> Result<PreselectionBatch, RepositoryError> {
        let mut guard = self.batches.lock().expect("repository mutex poisoned");
        if guard.contains_key(&batch.batch_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(batch.batch_id.clone(), batch.clone());
        Ok(batch)
    }

    fn fetch(&self, id: &BatchId) -> Result<Option<PreselectionBatch>, RepositoryError> {
        let guard = self.batches.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl PreselectionRepository for UnavailableRepository {
    fn insert(&self, _batch: PreselectionBatch) -> Result<PreselectionBatch, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &BatchId) -> Result<Option<PreselectionBatch>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service() -> (AdmissionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AdmissionService::new(repository.clone(), ScoringConfig::default())
        .expect("default policy is valid");
    (service, repository)
}

pub(super) fn router_with_service(service: AdmissionService<MemoryRepository>) -> axum::Router {
    admission_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// JSON sheet with one eligible and one rejected law applicant.
pub(super) fn sheet_payload(with_interviews: bool) -> Value {
    let mut top = json!({
        "per_num_doc": 72000001,
        "pos_codigo": "1234",
        "modalidad": ORDINARY,
        "programa": LAW,
        "total_aptitud": 54,
        "total_conocimiento": 63,
    });
    let mut low = json!({
        "per_num_doc": "72000002",
        "pos_codigo": "77",
        "modalidad": ORDINARY,
        "programa": LAW,
        "total_aptitud": 6,
        "total_conocimiento": 7,
    });
    if with_interviews {
        top["nota_entre"] = json!(15);
        low["nota_entre"] = Value::Null;
    }

    json!({
        "name": PERIOD,
        "rows": [top, low],
    })
}
