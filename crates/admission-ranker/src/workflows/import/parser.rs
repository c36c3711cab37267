use std::io::Read;

use super::normalizer::clean_header;
use super::CellValue;

/// Untyped sheet as read from a CSV export or a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

pub(crate) fn parse_sheet<R: Read>(name: &str, reader: R) -> Result<RawSheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawSheet {
        name: name.to_string(),
        headers,
        rows,
    })
}
