use serde::Serialize;

use super::domain::{ApplicantRecord, DocumentId, GroupKey};
use super::scoring::ScoringConfig;

/// Coarse classification reported alongside every rejected batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Schema,
    Referential,
    Numeric,
}

impl ErrorCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Referential => "referential",
            Self::Numeric => "numeric",
        }
    }
}

/// Data problems that abort a run before any result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("sheet '{sheet}' is missing required column '{column}' (accepted headers: {accepted})")]
    MissingColumn {
        sheet: String,
        column: &'static str,
        accepted: String,
    },
    #[error("sheet '{sheet}' row {row}: column '{column}' is empty")]
    MissingValue {
        sheet: String,
        row: usize,
        column: &'static str,
    },
    #[error("sheet '{sheet}' row {row}: column '{column}' value '{value}' is not numeric")]
    NonNumeric {
        sheet: String,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("sheet '{sheet}' row {row}: column '{column}' value {value} is outside 0..={max}")]
    OutOfRange {
        sheet: String,
        row: usize,
        column: &'static str,
        value: f64,
        max: f64,
    },
    #[error("sheet '{sheet}' row {row}: column '{column}' value {value} is negative")]
    Negative {
        sheet: String,
        row: usize,
        column: &'static str,
        value: f64,
    },
    #[error(
        "applicant {document_id} in group {group} is eligible for interview but has no interview score"
    )]
    MissingInterviewScore {
        document_id: DocumentId,
        group: GroupKey,
    },
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingColumn { .. } => ErrorCategory::Schema,
            Self::MissingValue { .. }
            | Self::NonNumeric { .. }
            | Self::OutOfRange { .. }
            | Self::Negative { .. }
            | Self::MissingInterviewScore { .. } => ErrorCategory::Numeric,
        }
    }
}

pub(crate) fn check_raw_scores(
    record: &ApplicantRecord,
    config: &ScoringConfig,
) -> Result<(), ValidationError> {
    check_bounded(record, "aptitude_raw", record.aptitude_raw, config.aptitude_max)?;
    check_bounded(
        record,
        "knowledge_raw",
        record.knowledge_raw,
        config.knowledge_max,
    )
}

pub(crate) fn check_interview_score(
    record: &ApplicantRecord,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonNumeric {
            sheet: record.period.clone(),
            row: record.row,
            column: "interview_score",
            value: value.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            sheet: record.period.clone(),
            row: record.row,
            column: "interview_score",
            value,
        });
    }

    Ok(())
}

fn check_bounded(
    record: &ApplicantRecord,
    column: &'static str,
    value: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonNumeric {
            sheet: record.period.clone(),
            row: record.row,
            column,
            value: value.to_string(),
        });
    }

    if !(0.0..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            sheet: record.period.clone(),
            row: record.row,
            column,
            value,
            max,
        });
    }

    Ok(())
}
