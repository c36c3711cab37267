use serde::Deserialize;
use serde_json::{Map, Value};

use super::normalizer::clean_header;
use super::parser::RawSheet;
use super::CellValue;

/// JSON form of one intake sheet: a name plus rows keyed by column header.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetPayload {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}

impl SheetPayload {
    /// Headers follow first-seen key order across rows.
    pub fn into_raw(self) -> RawSheet {
        let mut headers: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                let header = clean_header(key);
                if !headers.contains(&header) {
                    headers.push(header);
                }
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let cleaned: Map<String, Value> = row
                    .iter()
                    .map(|(key, value)| (clean_header(key), value.clone()))
                    .collect();
                headers
                    .iter()
                    .map(|header| cleaned.get(header).map_or(CellValue::Empty, CellValue::from_json))
                    .collect()
            })
            .collect();

        RawSheet {
            name: self.name,
            headers,
            rows,
        }
    }
}
