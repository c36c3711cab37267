use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque applicant identity as supplied by the intake sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Partition that scopes thresholds and merit ranks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub period: String,
    pub modality: String,
    pub program: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.period, self.modality, self.program)
    }
}

/// Column value carried through from the intake sheet untouched (apart from
/// document id and position code normalization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    pub value: String,
}

/// One applicant row after boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub document_id: DocumentId,
    pub period: String,
    pub modality: String,
    pub program: String,
    pub position_code: Option<String>,
    pub aptitude_raw: f64,
    pub knowledge_raw: f64,
    pub interview_score: Option<f64>,
    /// 1-based data row within the source sheet.
    pub row: usize,
    pub source_columns: Vec<SourceColumn>,
}

impl ApplicantRecord {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            period: self.period.clone(),
            modality: self.modality.clone(),
            program: self.program.clone(),
        }
    }
}

/// Named batch of records; one sheet of the intake workbook, one admission period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<ApplicantRecord>,
}

/// Scholarship preselection list supplied alongside the exam results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreselectionList {
    ids: BTreeSet<DocumentId>,
}

impl PreselectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: DocumentId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<DocumentId> for PreselectionList {
    fn from_iter<T: IntoIterator<Item = DocumentId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Outcome of the post-exam pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityStatus {
    EligibleForInterview,
    NotApproved,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EligibleForInterview => "ELIGIBLE_FOR_INTERVIEW",
            Self::NotApproved => "NOT_APPROVED",
        }
    }
}

/// Outcome of the post-interview pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalStatus {
    NotApproved,
    ApprovedEvaluation,
    Admitted,
}

impl FinalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApproved => "NOT_APPROVED",
            Self::ApprovedEvaluation => "APPROVED_EVALUATION",
            Self::Admitted => "ADMITTED",
        }
    }
}

/// Scholarship tracking flag, independent of the admission outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreselectionOutcome {
    Preselected,
    Regular,
}

impl PreselectionOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preselected => "PRESELECTED",
            Self::Regular => "REGULAR",
        }
    }
}

/// Which half of the admission process a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Exam,
    Interview,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Interview => "interview",
        }
    }
}
