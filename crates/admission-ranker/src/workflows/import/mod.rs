//! Intake of applicant sheets and preselection lists from CSV exports or JSON
//! payloads, bound to validated [`ApplicantSheet`]s.

mod binding;
mod mapping;
mod normalizer;
mod parser;
mod payload;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::workflows::admissions::{
    ApplicantSheet, DocumentId, ErrorCategory, PreselectionList, ValidationError,
};

use mapping::{column_for_header, Column};

pub use parser::RawSheet;
pub use payload::SheetPayload;

/// Cell as it arrives from a spreadsheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Number(number) => number.as_f64().map_or(Self::Empty, Self::Number),
            Value::String(text) => Self::from_text(text),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text form; integral numbers lose their fractional part so numeric
    /// document ids read the same as their text counterparts.
    pub fn render(&self) -> String {
        match self {
            Self::Number(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{value:.0}")
            }
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.trim().to_string(),
            Self::Empty => String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read intake file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("stage 1 must be processed before stage 2: preselection list {} not found", path.display())]
    PreselectionMissing { path: PathBuf },
}

impl ImportError {
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Io(_) => None,
            Self::Csv(_) => Some(ErrorCategory::Schema),
            Self::Validation(error) => Some(error.category()),
            Self::PreselectionMissing { .. } => Some(ErrorCategory::Referential),
        }
    }
}

pub struct SheetImporter;

impl SheetImporter {
    /// Read one sheet; the file stem names the admission period.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ApplicantSheet, ImportError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = std::fs::File::open(path)?;
        Self::from_reader(&name, file)
    }

    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<ApplicantSheet, ImportError> {
        let raw = parser::parse_sheet(name, reader)?;
        let sheet = binding::bind_sheet(raw)?;
        debug!(sheet = %sheet.name, rows = sheet.records.len(), "sheet imported");
        Ok(sheet)
    }

    pub fn from_payload(payload: SheetPayload) -> Result<ApplicantSheet, ValidationError> {
        binding::bind_sheet(payload.into_raw())
    }
}

pub struct PreselectionImporter;

impl PreselectionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PreselectionList, ImportError> {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(ImportError::PreselectionMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(error) => return Err(error.into()),
        };
        Self::from_reader(file)
    }

    /// One-column list keyed by the document id header.
    pub fn from_reader<R: Read>(reader: R) -> Result<PreselectionList, ImportError> {
        let raw = parser::parse_sheet("preselected", reader)?;
        let index = raw
            .headers
            .iter()
            .position(|header| column_for_header(header) == Some(Column::DocumentId))
            .ok_or_else(|| ValidationError::MissingColumn {
                sheet: raw.name.clone(),
                column: Column::DocumentId.canonical(),
                accepted: Column::DocumentId.accepted(),
            })?;

        let cells: Vec<CellValue> = raw
            .rows
            .into_iter()
            .filter_map(|mut row| (index < row.len()).then(|| row.swap_remove(index)))
            .collect();
        Ok(Self::from_cells(&cells))
    }

    pub fn from_cells(cells: &[CellValue]) -> PreselectionList {
        cells
            .iter()
            .map(CellValue::render)
            .filter(|id| !id.is_empty())
            .map(DocumentId)
            .collect()
    }
}
