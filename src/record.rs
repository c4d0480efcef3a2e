use crate::error::{EtlError, Result};
use csv::ReaderBuilder;
use serde_json::Value;
use std::path::Path;

/// An ordered set of rows sharing one column schema.
///
/// Every cell is carried as text; nothing in the pipeline needs typed values
/// and the relational store lands everything as TEXT anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds a record set from a JSON array of uniform objects. The column
    /// order follows the first object's key order; missing keys in later
    /// objects become empty cells.
    pub fn from_json_array(payload: &Value) -> Result<Self> {
        let items = payload.as_array().ok_or_else(|| EtlError::Api {
            message: "expected a JSON array of objects".to_string(),
        })?;

        let columns: Vec<String> = match items.first().and_then(Value::as_object) {
            Some(first) => first.keys().cloned().collect(),
            None if items.is_empty() => Vec::new(),
            None => {
                return Err(EtlError::Api {
                    message: "expected array elements to be objects".to_string(),
                })
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let object = item.as_object().ok_or_else(|| EtlError::Api {
                message: "expected array elements to be objects".to_string(),
            })?;
            let row = columns
                .iter()
                .map(|col| object.get(col).map(cell_to_string).unwrap_or_default())
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Parses CSV bytes with a header row.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);
        let columns = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Serializes to CSV bytes with a header row.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| EtlError::Io(e.into_error()))
    }

    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let bytes = self.to_csv_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Upper-cases every column name in place, leaving row values untouched.
    pub fn uppercase_columns(&mut self) {
        for column in &mut self.columns {
            *column = column.to_uppercase();
        }
    }
}
