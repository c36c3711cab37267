use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ApplicantSheet, PreselectionList};
use super::pipeline::{AdmissionPipeline, AdmissionResults, PipelineError};
use super::repository::{BatchId, PreselectionBatch, PreselectionRepository, RepositoryError};
use super::scoring::{ScoringConfig, ScoringConfigError};
use super::validation::ErrorCategory;

/// Service composing the scoring pipeline with the preselection hand-off.
pub struct AdmissionService<R> {
    repository: Arc<R>,
    pipeline: Arc<AdmissionPipeline>,
}

static BATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_batch_id() -> BatchId {
    let id = BATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BatchId(format!("batch-{id:06}"))
}

impl<R> AdmissionService<R>
where
    R: PreselectionRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        let pipeline = AdmissionPipeline::new(config)?;
        Ok(Self::with_pipeline(repository, pipeline))
    }

    pub fn with_pipeline(repository: Arc<R>, pipeline: AdmissionPipeline) -> Self {
        Self {
            repository,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &AdmissionPipeline {
        &self.pipeline
    }

    /// Score the exam stage and register the preselection list for the interview stage.
    ///
    /// Nothing is registered when the batch fails validation.
    pub fn exam_stage(
        &self,
        sheets: &[ApplicantSheet],
        preselected: PreselectionList,
    ) -> Result<ExamStageOutcome, AdmissionServiceError> {
        let results = self.pipeline.run_exam_stage(sheets).inspect_err(|error| {
            warn!(category = error.category().label(), %error, "exam stage rejected");
        })?;

        let batch = self.repository.insert(PreselectionBatch {
            batch_id: next_batch_id(),
            preselected,
            applicants: results.len(),
            registered_at: Utc::now(),
        })?;

        info!(
            batch_id = %batch.batch_id,
            applicants = batch.applicants,
            preselected = batch.preselected.len(),
            "exam stage processed"
        );

        Ok(ExamStageOutcome { batch, results })
    }

    /// Run the full pipeline against the preselection list registered by `exam_stage`.
    pub fn interview_stage(
        &self,
        batch_id: &BatchId,
        sheets: &[ApplicantSheet],
    ) -> Result<AdmissionResults, AdmissionServiceError> {
        let batch = self.batch(batch_id)?;

        let results = self
            .pipeline
            .run_interview_stage(sheets, &batch.preselected)
            .inspect_err(|error| {
                warn!(category = error.category().label(), %error, "interview stage rejected");
            })?;

        info!(
            batch_id = %batch_id,
            applicants = results.len(),
            "interview stage processed"
        );

        Ok(results)
    }

    pub fn batch(&self, batch_id: &BatchId) -> Result<PreselectionBatch, AdmissionServiceError> {
        self.repository
            .fetch(batch_id)?
            .ok_or_else(|| AdmissionServiceError::StageOneRequired {
                batch_id: batch_id.clone(),
            })
    }
}

/// Exam-stage results plus the batch the interview stage must reference.
#[derive(Debug, Clone)]
pub struct ExamStageOutcome {
    pub batch: PreselectionBatch,
    pub results: AdmissionResults,
}

#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("stage 1 must be processed before stage 2: no preselection list registered for batch {batch_id}")]
    StageOneRequired { batch_id: BatchId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AdmissionServiceError {
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Pipeline(error) => Some(error.category()),
            Self::StageOneRequired { .. } => Some(ErrorCategory::Referential),
            Self::Repository(_) => None,
        }
    }
}
