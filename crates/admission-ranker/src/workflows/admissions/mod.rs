//! Exam scoring, decile thresholds, merit ranking, and two-stage admission
//! classification.
//!
//! Records enter as validated [`ApplicantRecord`]s grouped into named sheets
//! (one per admission period). The [`AdmissionPipeline`] partitions them by
//! period, modality and program, scores every group independently, and hands
//! back an [`AdmissionResults`] set that the report module can render in the
//! column order expected by the admissions office.

pub mod domain;
pub mod pipeline;
pub mod report;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRecord, ApplicantSheet, DocumentId, EligibilityStatus, FinalStatus, GroupKey,
    PreselectionList, PreselectionOutcome, SourceColumn, Stage,
};
pub use pipeline::{AdmissionPipeline, AdmissionResults, GroupOutcome, PipelineError};
pub use report::{
    summarize, GroupSummaryView, ReportCell, ReportTable, EXAM_STAGE_COLUMNS,
    INTERVIEW_STAGE_COLUMNS,
};
pub use repository::{BatchId, BatchView, PreselectionBatch, PreselectionRepository, RepositoryError};
pub use router::{admission_router, ExamStageRequest, InterviewStageRequest};
pub use scoring::{
    classify_eligibility, classify_final_status, classify_preselection, competition_ranks,
    DecileRounding, GroupThreshold, InterviewResult, MissingInterviewPolicy, NormalizedScores,
    ScoreBasis, ScoredApplicant, ScoringConfig, ScoringConfigError, ScoringEngine, MEDICINE_PROGRAM,
};
pub use service::{AdmissionService, AdmissionServiceError, ExamStageOutcome};
pub use validation::{ErrorCategory, ValidationError};
