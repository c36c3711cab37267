mod config;
mod normalizer;
mod policy;
mod ranking;
mod threshold;

pub use config::{
    DecileRounding, MissingInterviewPolicy, ScoreBasis, ScoringConfig, ScoringConfigError,
    MEDICINE_PROGRAM,
};
pub use policy::{classify_eligibility, classify_final_status, classify_preselection};
pub use ranking::competition_ranks;

pub(crate) use ranking::merit_order;

use super::domain::{
    ApplicantRecord, EligibilityStatus, FinalStatus, PreselectionOutcome,
};
use super::validation::{check_interview_score, check_raw_scores, ValidationError};
use serde::{Deserialize, Serialize};

/// Stateless scorer that applies the institutional policy to applicant records.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Derive the composite scores for one record, rejecting missing or out of range input.
    pub fn normalize(&self, record: &ApplicantRecord) -> Result<NormalizedScores, ValidationError> {
        check_raw_scores(record, &self.config)?;
        Ok(normalizer::normalize_scores(
            record.aptitude_raw,
            record.knowledge_raw,
            &self.config,
        ))
    }

    /// Threshold for one (period, modality, program) group.
    pub fn group_threshold(&self, program: &str, members: &[NormalizedScores]) -> GroupThreshold {
        let basis_scores: Vec<f64> = members
            .iter()
            .map(|scores| scores.basis(self.config.threshold_basis))
            .collect();

        threshold::decile_threshold(
            &basis_scores,
            self.config.decile_weight_for(program),
            self.config.decile_rounding,
        )
    }

    /// Final score for an applicant entering the interview pass.
    ///
    /// Applicants rejected after the exam never sat the interview, so a missing
    /// score yields `None` for them instead of an error.
    pub fn final_score(
        &self,
        record: &ApplicantRecord,
        scores: &NormalizedScores,
        eligibility: EligibilityStatus,
    ) -> Result<Option<f64>, ValidationError> {
        match record.interview_score {
            Some(interview) => {
                check_interview_score(record, interview)?;
                Ok(Some(
                    scores.composite_80 + interview * self.config.interview_weight,
                ))
            }
            None if eligibility == EligibilityStatus::NotApproved => Ok(None),
            None => match self.config.missing_interview {
                MissingInterviewPolicy::TreatAsZero => Ok(Some(scores.composite_80)),
                MissingInterviewPolicy::Reject => Err(ValidationError::MissingInterviewScore {
                    document_id: record.document_id.clone(),
                    group: record.group_key(),
                }),
            },
        }
    }
}

/// Composite scores derived from the raw sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScores {
    pub aptitude_normalized: f64,
    pub knowledge_normalized: f64,
    pub composite_100: f64,
    pub composite_80: f64,
}

impl NormalizedScores {
    pub fn basis(&self, basis: ScoreBasis) -> f64 {
        match basis {
            ScoreBasis::Composite80 => self.composite_80,
            ScoreBasis::Composite100 => self.composite_100,
        }
    }
}

/// Group-level aggregates shared by every member of a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupThreshold {
    pub group_size: usize,
    /// Number of top scorers averaged (`R`).
    pub top_count: usize,
    pub top_decile_mean: f64,
    pub decile_weight: f64,
    pub admission_threshold: f64,
}

/// Post-interview fields; absent on exam-stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterviewResult {
    pub final_score: Option<f64>,
    pub final_merit_rank: Option<u32>,
    pub final_status: FinalStatus,
    pub preselection_outcome: PreselectionOutcome,
}

/// One applicant with every derived field attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredApplicant {
    pub record: ApplicantRecord,
    pub scores: NormalizedScores,
    pub exam_merit_rank: u32,
    pub group_top_decile_mean: f64,
    pub admission_threshold: f64,
    pub eligibility_status: EligibilityStatus,
    pub interview: Option<InterviewResult>,
}
