use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Program that receives the stricter decile weight out of the box.
pub const MEDICINE_PROGRAM: &str = "MEDICINA";

/// Institutional scoring policy. Every literal the admissions office has ever
/// tuned lives here rather than in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub aptitude_max: f64,
    pub knowledge_max: f64,
    pub aptitude_weight: f64,
    pub knowledge_weight: f64,
    /// Factor mapping the 0-100 composite onto the 0-80 exam scale.
    pub exam_scale: f64,
    pub default_decile_weight: f64,
    pub program_decile_weights: BTreeMap<String, f64>,
    pub interview_weight: f64,
    pub threshold_basis: ScoreBasis,
    pub decile_rounding: DecileRounding,
    pub missing_interview: MissingInterviewPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut program_decile_weights = BTreeMap::new();
        program_decile_weights.insert(MEDICINE_PROGRAM.to_string(), 0.6);

        Self {
            aptitude_max: 60.0,
            knowledge_max: 70.0,
            aptitude_weight: 0.3,
            knowledge_weight: 0.7,
            exam_scale: 0.8,
            default_decile_weight: 0.4,
            program_decile_weights,
            interview_weight: 1.0,
            threshold_basis: ScoreBasis::Composite80,
            decile_rounding: DecileRounding::HalfEven,
            missing_interview: MissingInterviewPolicy::Reject,
        }
    }
}

impl ScoringConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ScoringConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoringConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn decile_weight_for(&self, program: &str) -> f64 {
        self.program_decile_weights
            .get(program)
            .copied()
            .unwrap_or(self.default_decile_weight)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        positive("aptitude_max", self.aptitude_max)?;
        positive("knowledge_max", self.knowledge_max)?;
        non_negative("aptitude_weight", self.aptitude_weight)?;
        non_negative("knowledge_weight", self.knowledge_weight)?;
        positive("exam_scale", self.exam_scale)?;
        positive("default_decile_weight", self.default_decile_weight)?;
        non_negative("interview_weight", self.interview_weight)?;

        for (program, weight) in &self.program_decile_weights {
            positive(&format!("program_decile_weights.{program}"), *weight)?;
        }

        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<(), ScoringConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScoringConfigError::NotPositive {
            field: field.to_string(),
            value,
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ScoringConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScoringConfigError::Negative {
            field: field.to_string(),
            value,
        })
    }
}

/// Score column the decile threshold is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBasis {
    #[serde(rename = "composite_80")]
    Composite80,
    #[serde(rename = "composite_100")]
    Composite100,
}

/// Rounding applied to `N / 10` when sizing the top decile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecileRounding {
    HalfEven,
    HalfUp,
}

impl DecileRounding {
    /// Number of top scorers averaged for a group of `group_size`; never below one.
    pub fn top_count(self, group_size: usize) -> usize {
        let quotient = group_size / 10;
        let remainder = group_size % 10;

        let rounded = match remainder {
            0..=4 => quotient,
            6..=9 => quotient + 1,
            _ => match self {
                Self::HalfUp => quotient + 1,
                Self::HalfEven if quotient % 2 == 0 => quotient,
                Self::HalfEven => quotient + 1,
            },
        };

        rounded.max(1)
    }
}

/// What to do with an interview-eligible applicant who has no interview score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInterviewPolicy {
    Reject,
    TreatAsZero,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{field} must be a positive finite number (found {value})")]
    NotPositive { field: String, value: f64 },
    #[error("{field} must be a finite number >= 0 (found {value})")]
    Negative { field: String, value: f64 },
    #[error("failed to read scoring policy {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scoring policy JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
