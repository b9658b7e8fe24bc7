pub mod tabular;

use crate::app::Result;

pub use tabular::CsvStore;

/// One row: column name to cell value, in column order
pub type Record = serde_json::Map<String, serde_json::Value>;

pub trait RecordStore {
    /// Write a header and one row per record, replacing previous contents.
    ///
    /// Returns the number of rows written. Nothing is written for an empty
    /// input.
    fn write_records(&self, records: &[Record]) -> Result<usize>;

    fn read_records(&self) -> Result<Vec<Record>>;
}
