//! Append-only sinks for collected token records.

use super::create_writer;
use crate::types::TokenRecord;
use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage backend for collected records.
///
/// Each `append` is a complete write: once it returns `Ok`, the record
/// survives a crash of the process. No reordering or deduplication.
pub trait ResultStore: Send {
    /// Append a single record.
    fn append(&mut self, record: &TokenRecord) -> Result<()>;

    /// Number of records appended through this handle.
    fn appended(&self) -> usize;
}

/// CSV-backed result store using the fixed 13-column schema.
pub struct CsvResultStore {
    path: PathBuf,
    writer: csv::Writer<File>,
    appended: usize,
}

impl CsvResultStore {
    /// Create (or truncate) the output file and write its header row.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = create_writer(&path)?;

        writer
            .write_record(TokenRecord::HEADERS)
            .map_err(|e| Error::sink_write(&path, e))?;
        writer.flush().map_err(|e| Error::sink_write(&path, e))?;

        debug!(path = %path.display(), "Created result store");
        Ok(Self {
            path,
            writer,
            appended: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for CsvResultStore {
    fn append(&mut self, record: &TokenRecord) -> Result<()> {
        self.writer
            .write_record(record.fields())
            .map_err(|e| Error::sink_write(&self.path, e))?;
        self.writer
            .flush()
            .map_err(|e| Error::sink_write(&self.path, e))?;

        self.appended += 1;
        debug!(wallet = %record.wallet, name = %record.name, "Record written");
        Ok(())
    }

    fn appended(&self) -> usize {
        self.appended
    }
}

/// In-memory result store for testing.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    records: Vec<TokenRecord>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }
}

impl ResultStore for MemoryResultStore {
    fn append(&mut self, record: &TokenRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn appended(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::read_records;

    fn record(wallet: &str, name: &str) -> TokenRecord {
        TokenRecord {
            wallet: wallet.to_string(),
            name: name.to_string(),
            buy_amount: "1".to_string(),
            buy_price: "0.01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_store_writes_header_even_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");

        let store = CsvResultStore::create(&path).unwrap();
        assert_eq!(store.appended(), 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), TokenRecord::HEADERS.join(","));
    }

    #[test]
    fn test_csv_store_appends_are_visible_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");

        let mut store = CsvResultStore::create(&path).unwrap();
        store.append(&record("w1", "TOK")).unwrap();

        // Readable while the store is still open
        let records: Vec<TokenRecord> = read_records(&path).unwrap();
        assert_eq!(records, vec![record("w1", "TOK")]);

        store.append(&record("w2", "PEPE")).unwrap();
        let records: Vec<TokenRecord> = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].wallet, "w2");
        assert_eq!(store.appended(), 2);
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");

        let mut first = CsvResultStore::create(&path).unwrap();
        first.append(&record("w1", "TOK")).unwrap();
        drop(first);

        let _second = CsvResultStore::create(&path).unwrap();
        let records: Vec<TokenRecord> = read_records(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_memory_store_keeps_append_order() {
        let mut store = MemoryResultStore::new();
        store.append(&record("w1", "A")).unwrap();
        store.append(&record("w1", "B")).unwrap();

        let names: Vec<_> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.appended(), 2);
    }
}
