use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use super::super::domain::Stage;
use super::super::pipeline::AdmissionResults;
use super::super::scoring::ScoredApplicant;
use super::{
    is_derived_header, is_period_header, EXAM_STAGE_COLUMNS, INTERVIEW_STAGE_COLUMNS,
    PERIOD_COLUMN,
};

/// Single rendered value of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportCell {
    Text(String),
    Integer(u64),
    Number(f64),
    Empty,
}

impl ReportCell {
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Empty => String::new(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(value) => Value::String(value.clone()),
            Self::Integer(value) => Value::from(*value),
            Self::Number(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Empty => Value::Null,
        }
    }
}

impl From<Option<f64>> for ReportCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

/// Tabular view of a result set: intake columns first, derived columns after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportTable {
    pub fn from_results(results: &AdmissionResults) -> Self {
        let intake: Vec<String> = results
            .source_headers
            .iter()
            .filter(|header| !is_derived_header(header))
            .cloned()
            .collect();
        let append_period = !intake.iter().any(|header| is_period_header(header));

        let derived: &[&str] = match results.stage {
            Stage::Exam => &EXAM_STAGE_COLUMNS,
            Stage::Interview => &INTERVIEW_STAGE_COLUMNS,
        };

        let mut columns = intake.clone();
        if append_period {
            columns.push(PERIOD_COLUMN.to_string());
        }
        columns.extend(derived.iter().map(|column| column.to_string()));

        let rows = results
            .applicants()
            .map(|applicant| {
                let mut row: Vec<ReportCell> = intake
                    .iter()
                    .map(|header| source_value(applicant, header))
                    .collect();
                if append_period {
                    row.push(ReportCell::Text(applicant.record.period.clone()));
                }
                row.extend(derived.iter().map(|column| derived_value(applicant, column)));
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows keyed by column name, preserving column order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(ReportCell::render))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn source_value(applicant: &ScoredApplicant, header: &str) -> ReportCell {
    applicant
        .record
        .source_columns
        .iter()
        .find(|column| column.name == header)
        .filter(|column| !column.value.is_empty())
        .map_or(ReportCell::Empty, |column| {
            ReportCell::Text(column.value.clone())
        })
}

fn derived_value(applicant: &ScoredApplicant, column: &str) -> ReportCell {
    let interview = applicant.interview.as_ref();
    match column {
        "aptitude_normalized" => ReportCell::Number(applicant.scores.aptitude_normalized),
        "knowledge_normalized" => ReportCell::Number(applicant.scores.knowledge_normalized),
        "composite_100" => ReportCell::Number(applicant.scores.composite_100),
        "composite_80" => ReportCell::Number(applicant.scores.composite_80),
        "exam_merit_rank" => ReportCell::Integer(u64::from(applicant.exam_merit_rank)),
        "final_score" => interview.and_then(|result| result.final_score).into(),
        "final_merit_rank" => interview
            .and_then(|result| result.final_merit_rank)
            .map_or(ReportCell::Empty, |rank| ReportCell::Integer(u64::from(rank))),
        "group_top_decile_mean" => ReportCell::Number(applicant.group_top_decile_mean),
        "admission_threshold" => ReportCell::Number(applicant.admission_threshold),
        "eligibility_status" => {
            ReportCell::Text(applicant.eligibility_status.label().to_string())
        }
        "final_status" => interview.map_or(ReportCell::Empty, |result| {
            ReportCell::Text(result.final_status.label().to_string())
        }),
        "preselection_outcome" => interview.map_or(ReportCell::Empty, |result| {
            ReportCell::Text(result.preselection_outcome.label().to_string())
        }),
        _ => ReportCell::Empty,
    }
}

/// Counts and aggregates for one (period, modality, program) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummaryView {
    pub period: String,
    pub modality: String,
    pub program: String,
    pub applicants: usize,
    pub top_count: usize,
    pub top_decile_mean: f64,
    pub decile_weight: f64,
    pub admission_threshold: f64,
    pub eligible: usize,
    pub not_approved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admitted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_evaluation: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preselected: Option<usize>,
}
