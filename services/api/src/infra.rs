use admission_ranker::config::AppConfig;
use admission_ranker::error::AppError;
use admission_ranker::workflows::admissions::{
    BatchId, PreselectionBatch, PreselectionRepository, RepositoryError, ScoringConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) policy: Arc<ScoringConfig>,
}

/// Preselection lists registered by exam-stage requests, kept for the process lifetime.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPreselectionRepository {
    batches: Arc<Mutex<HashMap<BatchId, PreselectionBatch>>>,
}

impl PreselectionRepository for InMemoryPreselectionRepository {
    fn insert(&self, batch: PreselectionBatch) -> Result<PreselectionBatch, RepositoryError> {
        let mut guard = self
            .batches
            .lock()
            .map_err(|_| RepositoryError::Unavailable("batch registry poisoned".to_string()))?;
        if guard.contains_key(&batch.batch_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(batch.batch_id.clone(), batch.clone());
        Ok(batch)
    }

    fn fetch(&self, id: &BatchId) -> Result<Option<PreselectionBatch>, RepositoryError> {
        let guard = self
            .batches
            .lock()
            .map_err(|_| RepositoryError::Unavailable("batch registry poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Environment configuration with an optional policy file taking precedence.
pub(crate) fn load_config(policy: Option<&Path>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = policy {
        config.apply_scoring_policy(path)?;
    }
    Ok(config)
}
