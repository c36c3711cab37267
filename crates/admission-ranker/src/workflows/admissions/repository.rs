use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PreselectionList;

/// Identifier handed out when an exam-stage batch registers its preselection list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub String);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preselection list registered by the exam stage for the interview stage to consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreselectionBatch {
    pub batch_id: BatchId,
    pub preselected: PreselectionList,
    pub applicants: usize,
    pub registered_at: DateTime<Utc>,
}

impl PreselectionBatch {
    pub fn view(&self) -> BatchView {
        BatchView {
            batch_id: self.batch_id.clone(),
            preselected: self.preselected.len(),
            applicants: self.applicants,
            registered_at: self.registered_at,
        }
    }
}

/// Storage abstraction for the stage hand-off; the core never touches disk.
pub trait PreselectionRepository: Send + Sync {
    fn insert(&self, batch: PreselectionBatch) -> Result<PreselectionBatch, RepositoryError>;
    fn fetch(&self, id: &BatchId) -> Result<Option<PreselectionBatch>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("batch already registered")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Exposed summary of a registered batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchView {
    pub batch_id: BatchId,
    pub preselected: usize,
    pub applicants: usize,
    pub registered_at: DateTime<Utc>,
}
