//! Tabular file storage.
//!
//! Both pipeline stages exchange data as delimited files with a header row.
//! Reading is lenient about ragged rows; writing always emits the header.

pub mod results;

pub use results::{CsvResultStore, MemoryResultStore, ResultStore};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// One data row keyed by the file's header names, in column order.
///
/// Columns past the end of a short row are absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRow {
    cells: Vec<(String, String)>,
}

impl TabularRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `column`, if this row has it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

fn open_source(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| Error::SourceOpen {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(file))
}

/// Load every data row of a headed file, in file order.
pub fn load_rows(path: &Path) -> Result<Vec<TabularRow>> {
    let mut reader = open_source(path)?;
    let read_err = |source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(read_err)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        rows.push(TabularRow::from_pairs(
            headers.iter().zip(record.iter()),
        ));
    }

    debug!(path = %path.display(), rows = rows.len(), "Loaded tabular rows");
    Ok(rows)
}

/// Load every data row of a headed file, deserialized by column name.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = open_source(path)?;

    let mut records = Vec::new();
    for record in reader.deserialize() {
        let record: T = record.map_err(|source| Error::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }

    debug!(path = %path.display(), records = records.len(), "Read records");
    Ok(records)
}

/// Create (or truncate) `path` and write a header followed by `rows`.
pub fn write_table<R, F>(path: &Path, headers: &[&str], rows: R) -> Result<usize>
where
    R: IntoIterator<Item = F>,
    F: IntoIterator,
    F::Item: AsRef<[u8]>,
{
    let mut writer = create_writer(path)?;
    writer
        .write_record(headers)
        .map_err(|e| Error::sink_write(path, e))?;

    let mut written = 0;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| Error::sink_write(path, e))?;
        written += 1;
    }

    writer.flush().map_err(|e| Error::sink_write(path, e))?;
    debug!(path = %path.display(), rows = written, "Wrote table");
    Ok(written)
}

pub(crate) fn create_writer(path: &Path) -> Result<csv::Writer<File>> {
    let sink_open = |source| Error::SinkOpen {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(sink_open)?;
        }
    }
    let file = File::create(path).map_err(sink_open)?;

    Ok(csv::WriterBuilder::new().has_headers(false).from_writer(file))
}
