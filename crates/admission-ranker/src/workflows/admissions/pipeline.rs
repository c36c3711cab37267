use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    ApplicantRecord, ApplicantSheet, GroupKey, PreselectionList, Stage,
};
use super::scoring::{
    classify_eligibility, classify_final_status, classify_preselection, competition_ranks,
    merit_order, GroupThreshold, InterviewResult, NormalizedScores, ScoredApplicant,
    ScoringConfig, ScoringConfigError, ScoringEngine,
};
use super::validation::{ErrorCategory, ValidationError};

/// Grouping/orchestration driver for both admission stages.
#[derive(Debug, Clone)]
pub struct AdmissionPipeline {
    engine: ScoringEngine,
}

impl AdmissionPipeline {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            engine: ScoringEngine::new(config)?,
        })
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Normalize, threshold, classify eligibility and rank exam merit.
    pub fn run_exam_stage(
        &self,
        sheets: &[ApplicantSheet],
    ) -> Result<AdmissionResults, PipelineError> {
        self.run(sheets, None)
    }

    /// Full pipeline including interview scores, final merit and the
    /// preselection overlay.
    pub fn run_interview_stage(
        &self,
        sheets: &[ApplicantSheet],
        preselection: &PreselectionList,
    ) -> Result<AdmissionResults, PipelineError> {
        self.run(sheets, Some(preselection))
    }

    fn run(
        &self,
        sheets: &[ApplicantSheet],
        preselection: Option<&PreselectionList>,
    ) -> Result<AdmissionResults, PipelineError> {
        let stage = if preselection.is_some() {
            Stage::Interview
        } else {
            Stage::Exam
        };

        let groups = partition(sheets);
        if groups.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }

        info!(
            stage = stage.label(),
            sheets = sheets.len(),
            groups = groups.len(),
            "scoring admission batch"
        );

        let scored: Vec<Result<GroupOutcome, ValidationError>> = groups
            .into_par_iter()
            .map(|(key, members)| self.score_group(key, members, preselection))
            .collect();

        let groups = scored.into_iter().collect::<Result<Vec<_>, _>>()?;

        Ok(AdmissionResults {
            stage,
            source_headers: source_headers(sheets),
            groups,
        })
    }

    fn score_group(
        &self,
        key: GroupKey,
        members: Vec<&ApplicantRecord>,
        preselection: Option<&PreselectionList>,
    ) -> Result<GroupOutcome, ValidationError> {
        let scores = members
            .iter()
            .map(|record| self.engine.normalize(record))
            .collect::<Result<Vec<NormalizedScores>, _>>()?;

        let threshold = self.engine.group_threshold(&key.program, &scores);
        debug!(
            group = %key,
            size = threshold.group_size,
            top_count = threshold.top_count,
            threshold = threshold.admission_threshold,
            "group threshold computed"
        );

        let exam_scores: Vec<f64> = scores.iter().map(|s| s.composite_80).collect();
        let exam_ranks = competition_ranks(&exam_scores);

        let mut applicants: Vec<ScoredApplicant> = members
            .iter()
            .zip(&scores)
            .zip(&exam_ranks)
            .map(|((record, scores), rank)| ScoredApplicant {
                record: (*record).clone(),
                scores: *scores,
                exam_merit_rank: *rank,
                group_top_decile_mean: threshold.top_decile_mean,
                admission_threshold: threshold.admission_threshold,
                eligibility_status: classify_eligibility(
                    scores.composite_80,
                    threshold.admission_threshold,
                ),
                interview: None,
            })
            .collect();

        let mut order = merit_order(&exam_scores);

        if let Some(preselection) = preselection {
            order = self.apply_interview_stage(&mut applicants, &order, preselection)?;
        }

        let applicants = reorder(applicants, &order);

        Ok(GroupOutcome {
            key,
            threshold,
            applicants,
        })
    }

    /// Attach interview results and return the final-merit emission order.
    fn apply_interview_stage(
        &self,
        applicants: &mut [ScoredApplicant],
        exam_order: &[usize],
        preselection: &PreselectionList,
    ) -> Result<Vec<usize>, ValidationError> {
        let final_scores = applicants
            .iter()
            .map(|applicant| {
                self.engine.final_score(
                    &applicant.record,
                    &applicant.scores,
                    applicant.eligibility_status,
                )
            })
            .collect::<Result<Vec<Option<f64>>, _>>()?;

        // Unscored applicants trail the ranking in exam-merit order.
        let mut scored_positions = Vec::new();
        let mut unscored_positions = Vec::new();
        for &index in exam_order {
            match final_scores[index] {
                Some(_) => scored_positions.push(index),
                None => unscored_positions.push(index),
            }
        }

        let ranked_scores: Vec<f64> = scored_positions
            .iter()
            .filter_map(|&index| final_scores[index])
            .collect();
        let ranks = competition_ranks(&ranked_scores);
        let mut final_ranks: Vec<Option<u32>> = vec![None; applicants.len()];
        for (slot, &index) in scored_positions.iter().enumerate() {
            final_ranks[index] = Some(ranks[slot]);
        }

        for (index, applicant) in applicants.iter_mut().enumerate() {
            let preselected = preselection.contains(&applicant.record.document_id);
            let final_status = classify_final_status(applicant.eligibility_status, preselected);
            applicant.interview = Some(InterviewResult {
                final_score: final_scores[index],
                final_merit_rank: final_ranks[index],
                final_status,
                preselection_outcome: classify_preselection(final_status, preselected),
            });
        }

        let mut order: Vec<usize> = merit_order(&ranked_scores)
            .into_iter()
            .map(|slot| scored_positions[slot])
            .collect();
        order.extend(unscored_positions);
        Ok(order)
    }
}

/// Group records by (period, modality, program) across every sheet.
///
/// Periods come in first-seen order; within a period, modalities then
/// programs in first-seen order, skipping empty combinations.
fn partition(sheets: &[ApplicantSheet]) -> Vec<(GroupKey, Vec<&ApplicantRecord>)> {
    let records: Vec<&ApplicantRecord> = sheets
        .iter()
        .flat_map(|sheet| sheet.records.iter())
        .collect();

    let mut buckets: HashMap<(&str, &str, &str), Vec<&ApplicantRecord>> = HashMap::new();
    for &record in &records {
        buckets
            .entry((
                record.period.as_str(),
                record.modality.as_str(),
                record.program.as_str(),
            ))
            .or_default()
            .push(record);
    }

    let mut groups = Vec::with_capacity(buckets.len());
    for period in first_seen(records.iter().copied().map(|r| r.period.as_str())) {
        let in_period = || records.iter().copied().filter(move |r| r.period == period);
        let modalities = first_seen(in_period().map(|r| r.modality.as_str()));
        let programs = first_seen(in_period().map(|r| r.program.as_str()));

        for modality in &modalities {
            for program in &programs {
                if let Some(members) = buckets.remove(&(period, *modality, *program)) {
                    let key = GroupKey {
                        period: period.to_string(),
                        modality: modality.to_string(),
                        program: program.to_string(),
                    };
                    groups.push((key, members));
                }
            }
        }
    }

    groups
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn source_headers(sheets: &[ApplicantSheet]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for header in sheets.iter().flat_map(|sheet| sheet.headers.iter()) {
        if !headers.contains(header) {
            headers.push(header.clone());
        }
    }
    headers
}

fn reorder(applicants: Vec<ScoredApplicant>, order: &[usize]) -> Vec<ScoredApplicant> {
    let mut slots: Vec<Option<ScoredApplicant>> = applicants.into_iter().map(Some).collect();
    order
        .iter()
        .filter_map(|&index| slots[index].take())
        .collect()
}

/// Scored members of one (period, modality, program) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupOutcome {
    pub key: GroupKey,
    pub threshold: GroupThreshold,
    /// Members in merit order of the stage's last ranking.
    pub applicants: Vec<ScoredApplicant>,
}

/// Enriched result set handed back to the I/O layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionResults {
    pub stage: Stage,
    /// Union of the intake headers across sheets, first-seen order.
    pub source_headers: Vec<String>,
    pub groups: Vec<GroupOutcome>,
}

impl AdmissionResults {
    pub fn applicants(&self) -> impl Iterator<Item = &ScoredApplicant> {
        self.groups.iter().flat_map(|group| group.applicants.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.applicants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no applicant records supplied")]
    EmptyBatch,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(error) => error.category(),
            Self::EmptyBatch => ErrorCategory::Schema,
        }
    }
}
