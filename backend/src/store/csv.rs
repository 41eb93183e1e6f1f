//! CSV file implementation of [`RowStore`]

use csv::{ReaderBuilder, WriterBuilder};
use serde_json::Value;
use shared::validation::text_from_value;
use shared::{RawRow, RawTable};
use std::fs;
use std::path::{Path, PathBuf};

use super::{RowStore, StoreResult};

/// Table stored as a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvRowStore {
    path: PathBuf,
}

impl CsvRowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RowStore for CsvRowStore {
    fn read_rows(&self) -> StoreResult<Option<RawTable>> {
        if !self.path.exists() || fs::metadata(&self.path)?.len() == 0 {
            return Ok(None);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRow = columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.clone(), Value::String(cell.trim().to_string())))
                .collect();

            // Skip fully blank lines
            if row.values().all(shared::is_blank) {
                continue;
            }
            rows.push(row);
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "Read rows");
        Ok(Some(RawTable { columns, rows }))
    }

    fn write_rows(&self, table: &RawTable) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut writer = WriterBuilder::new().from_path(&tmp)?;
            writer.write_record(&table.columns)?;
            for row in &table.rows {
                writer.write_record(
                    table
                        .columns
                        .iter()
                        .map(|column| row.get(column).map(text_from_value).unwrap_or_default()),
                )?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), rows = table.rows.len(), "Wrote rows");
        Ok(())
    }
}
