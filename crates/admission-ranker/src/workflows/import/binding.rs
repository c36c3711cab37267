use std::collections::HashMap;

use crate::workflows::admissions::{
    ApplicantRecord, ApplicantSheet, DocumentId, SourceColumn, ValidationError,
};

use super::mapping::{column_for_header, Column};
use super::normalizer::pad_code;
use super::parser::RawSheet;
use super::CellValue;

const POSITION_CODE_WIDTH: usize = 8;

/// Validate a raw sheet and bind its rows to applicant records.
pub(crate) fn bind_sheet(raw: RawSheet) -> Result<ApplicantSheet, ValidationError> {
    let columns = resolve_columns(&raw)?;

    let mut records = Vec::with_capacity(raw.rows.len());
    for (index, row) in raw.rows.iter().enumerate() {
        records.push(bind_row(&raw, &columns, row, index + 1)?);
    }

    Ok(ApplicantSheet {
        name: raw.name,
        headers: raw.headers,
        records,
    })
}

fn resolve_columns(raw: &RawSheet) -> Result<HashMap<Column, usize>, ValidationError> {
    let mut columns = HashMap::new();
    for (index, header) in raw.headers.iter().enumerate() {
        if let Some(column) = column_for_header(header) {
            columns.entry(column).or_insert(index);
        }
    }

    if let Some(missing) = Column::REQUIRED
        .iter()
        .find(|column| !columns.contains_key(*column))
    {
        return Err(ValidationError::MissingColumn {
            sheet: raw.name.clone(),
            column: missing.canonical(),
            accepted: missing.accepted(),
        });
    }

    Ok(columns)
}

fn bind_row(
    raw: &RawSheet,
    columns: &HashMap<Column, usize>,
    row: &[CellValue],
    row_number: usize,
) -> Result<ApplicantRecord, ValidationError> {
    let cells = RowCells {
        sheet: &raw.name,
        columns,
        row,
        row_number,
    };

    let document_id = DocumentId(cells.required_text(Column::DocumentId)?);
    let modality = cells.required_text(Column::Modality)?;
    let program = cells.required_text(Column::Program)?;
    let aptitude_raw = cells.required_number(Column::AptitudeRaw)?;
    let knowledge_raw = cells.required_number(Column::KnowledgeRaw)?;
    let interview_score = cells.number(Column::InterviewScore)?;
    let period = Some(cells.get(Column::Period).render())
        .filter(|period| !period.is_empty())
        .unwrap_or_else(|| raw.name.clone());
    let position_code = Some(cells.get(Column::PositionCode).render())
        .filter(|code| !code.is_empty())
        .map(|code| pad_code(&code, POSITION_CODE_WIDTH));

    let document_index = columns.get(&Column::DocumentId).copied();
    let position_index = columns.get(&Column::PositionCode).copied();
    let source_columns = raw
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let value = if Some(index) == document_index {
                document_id.to_string()
            } else if Some(index) == position_index {
                position_code.clone().unwrap_or_default()
            } else {
                row.get(index).map(CellValue::render).unwrap_or_default()
            };
            SourceColumn {
                name: header.clone(),
                value,
            }
        })
        .collect();

    Ok(ApplicantRecord {
        document_id,
        period,
        modality,
        program,
        position_code,
        aptitude_raw,
        knowledge_raw,
        interview_score,
        row: row_number,
        source_columns,
    })
}

static EMPTY_CELL: CellValue = CellValue::Empty;

struct RowCells<'a> {
    sheet: &'a str,
    columns: &'a HashMap<Column, usize>,
    row: &'a [CellValue],
    row_number: usize,
}

impl<'a> RowCells<'a> {
    fn get(&self, column: Column) -> &'a CellValue {
        self.columns
            .get(&column)
            .and_then(|index| self.row.get(*index))
            .unwrap_or(&EMPTY_CELL)
    }

    fn missing(&self, column: Column) -> ValidationError {
        ValidationError::MissingValue {
            sheet: self.sheet.to_string(),
            row: self.row_number,
            column: column.canonical(),
        }
    }

    fn required_text(&self, column: Column) -> Result<String, ValidationError> {
        let value = self.get(column).render();
        if value.is_empty() {
            return Err(self.missing(column));
        }
        Ok(value)
    }

    fn required_number(&self, column: Column) -> Result<f64, ValidationError> {
        self.number(column)?.ok_or_else(|| self.missing(column))
    }

    /// Numeric cell, accepting a decimal comma in text cells.
    fn number(&self, column: Column) -> Result<Option<f64>, ValidationError> {
        match self.get(column) {
            CellValue::Empty => Ok(None),
            CellValue::Number(value) => Ok(Some(*value)),
            CellValue::Text(text) => text
                .trim()
                .replace(',', ".")
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ValidationError::NonNumeric {
                    sheet: self.sheet.to_string(),
                    row: self.row_number,
                    column: column.canonical(),
                    value: text.clone(),
                }),
        }
    }
}
