use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::app::Result;
use crate::store::{Record, RecordStore};

/// CSV file with JSON-encoded cells for structured values
pub struct CsvStore {
    path: PathBuf,
    field_names: Option<Vec<String>>,
}

impl CsvStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            field_names: None,
        }
    }

    /// Use these columns instead of the keys of the first record
    pub fn with_field_names(mut self, field_names: Vec<String>) -> Self {
        self.field_names = Some(field_names);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_cell(value: Option<&Value>) -> Result<String> {
        Ok(match value {
            None | Some(Value::Null) => String::new(),
            // Text that would itself decode as JSON is quoted so it reads back unchanged
            Some(Value::String(s)) if serde_json::from_str::<Value>(s).is_ok() => {
                serde_json::to_string(s)?
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => serde_json::to_string(other)?,
        })
    }

    fn decode_cell(cell: &str) -> Value {
        serde_json::from_str(cell).unwrap_or_else(|_| Value::String(cell.to_string()))
    }
}

impl RecordStore for CsvStore {
    fn write_records(&self, records: &[Record]) -> Result<usize> {
        let Some(first) = records.first() else {
            debug!("No records to write to {}", self.path.display());
            return Ok(0);
        };

        let field_names = match &self.field_names {
            Some(names) => names.clone(),
            None => first.keys().cloned().collect(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(&field_names)?;
        for record in records {
            let row = field_names
                .iter()
                .map(|name| Self::encode_cell(record.get(name)))
                .collect::<Result<Vec<_>>>()?;
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(records.len())
    }

    fn read_records(&self) -> Result<Vec<Record>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.to_string(), Self::decode_cell(cell)))
                .collect::<Record>();
            records.push(record);
        }
        Ok(records)
    }
}
