//! Source description and the tokenizer boundary.
//!
//! A [`SourceDescriptor`] names what to load (path + [`SourceFormat`]); a
//! [`DelimitedSource`] wraps the `csv` tokenizer over that source and drives a
//! per-record callback. Opening is eager so that open-time failures surface
//! synchronously, before any background work is scheduled.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use crate::error::{OpenError, OpenResult};
use crate::table::Row;

/// Supported delimited-text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl SourceFormat {
    /// The field delimiter byte for this format.
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }

    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            _ => None,
        }
    }
}

/// An immutable (location, format) pair naming one loadable source.
///
/// Fixed for the lifetime of a loader; the format determines the delimiter
/// byte handed to the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Path to the input file.
    pub path: PathBuf,
    /// Delimited-text format of the file.
    pub format: SourceFormat,
}

impl SourceDescriptor {
    /// Describe a source with an explicit format.
    pub fn new(path: impl Into<PathBuf>, format: SourceFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Describe a source, inferring the format from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> OpenResult<Self> {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| OpenError::UnknownFormat { path: path.clone() })?;
        Ok(Self { path, format })
    }
}

/// An opened delimited-text source, ready to be parsed once.
///
/// The underlying reader is configured without a header row (every line is a
/// data row) and with flexible field counts (rows may differ in arity).
pub struct DelimitedSource {
    reader: csv::Reader<Box<dyn io::Read + Send>>,
}

impl DelimitedSource {
    /// Open the file named by `descriptor`.
    ///
    /// The file is opened eagerly; a missing file or permission failure is
    /// returned here rather than from a later `parse`.
    pub fn open(descriptor: &SourceDescriptor) -> OpenResult<Self> {
        let file = File::open(&descriptor.path)?;
        let input: Box<dyn io::Read + Send> = Box::new(BufReader::new(file));
        Ok(Self::from_reader(input, descriptor.format))
    }

    /// Build a source over an in-memory string.
    pub fn from_string(input: impl Into<String>, format: SourceFormat) -> Self {
        let cursor: Box<dyn io::Read + Send> = Box::new(io::Cursor::new(input.into().into_bytes()));
        Self::from_reader(cursor, format)
    }

    fn from_reader(input: Box<dyn io::Read + Send>, format: SourceFormat) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(format.delimiter())
            .from_reader(input);
        Self { reader }
    }

    /// Drive `on_row` once per record, in source order, with a 0-based index.
    ///
    /// Stops the first time `on_row` returns `false`. A record that cannot be
    /// read (I/O or encoding failure mid-stream) ends the stream; the rows
    /// produced up to that point stand.
    pub fn parse<F>(mut self, mut on_row: F)
    where
        F: FnMut(u64, Row) -> bool,
    {
        for (index, result) in self.reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(_) => break,
            };
            let fields: Row = record.iter().map(str::to_string).collect();
            if !on_row(index as u64, fields) {
                break;
            }
        }
    }
}

impl std::fmt::Debug for DelimitedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelimitedSource").finish_non_exhaustive()
    }
}
