//! Record source: read a header-validated delimited file into records.
//!
//! The whole file is read eagerly. Batches are a few hundred rows at most,
//! and validating the header plus "at least one row" up front means a bad
//! file fails before any PDF is produced.

use crate::config::{DataFormat, TextEncoding};
use crate::error::Csv2PdfError;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// Columns every data file must have. Other columns are ignored.
pub const REQUIRED_FIELDS: [&str; 3] = ["product", "price", "qty"];

const BOM: char = '\u{feff}';

/// One data row as a field-name → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    index: usize,
    fields: HashMap<String, String>,
}

impl Record {
    /// Build a record from `(name, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V, I>(index: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            index,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 1-based position of the row in the file (header excluded).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Trimmed value of `name`, or `""` when the column is absent or empty.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// Untrimmed value of `name`.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Header plus every data row, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Read `path` with the given delimiter and encoding.
///
/// # Errors
/// - [`Csv2PdfError::MissingHeader`]: the file has no header row
/// - [`Csv2PdfError::MissingColumns`]: a [`REQUIRED_FIELDS`] column is absent
/// - [`Csv2PdfError::EmptyData`]: the header is followed by no rows
/// - [`Csv2PdfError::DataRead`]: unreadable, not valid UTF-8, or malformed
pub fn read_records(path: &Path, format: &DataFormat) -> Result<RecordSet, Csv2PdfError> {
    let bytes = std::fs::read(path).map_err(|e| data_read(path, e))?;
    let text = decode(&bytes, format.encoding).map_err(|e| data_read(path, e))?;
    parse_records(path, text, format.delimiter)
}

/// Parse already-decoded text. `source` is only used in error messages.
pub fn parse_records(
    source: &Path,
    text: &str,
    delimiter: u8,
) -> Result<RecordSet, Csv2PdfError> {
    // The csv reader skips blank lines, which would promote the first data
    // line to header. A blank first line means there is no header.
    let first_line = text.lines().next().map(|l| l.trim_end_matches('\r'));
    if first_line.map_or(true, str::is_empty) {
        return Err(Csv2PdfError::MissingHeader {
            path: source.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| data_read(source, e))?
        .iter()
        .map(str::to_owned)
        .collect();

    if headers.is_empty() {
        return Err(Csv2PdfError::MissingHeader {
            path: source.to_path_buf(),
        });
    }

    let missing = missing_fields(&headers);
    if !missing.is_empty() {
        return Err(Csv2PdfError::MissingColumns {
            missing,
            found: headers,
        });
    }

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| data_read(source, e))?;
        // Short rows leave trailing columns absent; extra cells have no
        // header and are dropped by the zip.
        let record = Record::from_pairs(
            i + 1,
            headers.iter().map(String::as_str).zip(row.iter()),
        );
        records.push(record);
    }

    if records.is_empty() {
        return Err(Csv2PdfError::EmptyData {
            path: source.to_path_buf(),
        });
    }

    debug!(
        "Read {} records with columns {:?} from {}",
        records.len(),
        headers,
        source.display()
    );

    Ok(RecordSet { headers, records })
}

/// Required fields absent from `headers`, sorted.
pub fn missing_fields(headers: &[String]) -> Vec<String> {
    let present: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
    REQUIRED_FIELDS
        .iter()
        .copied()
        .collect::<BTreeSet<&str>>()
        .difference(&present)
        .map(|s| s.to_string())
        .collect()
}

fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<&str, std::str::Utf8Error> {
    let text = std::str::from_utf8(bytes)?;
    Ok(match encoding {
        TextEncoding::Utf8Sig => text.strip_prefix(BOM).unwrap_or(text),
        TextEncoding::Utf8 => text,
    })
}

fn data_read(path: &Path, e: impl std::fmt::Display) -> Csv2PdfError {
    Csv2PdfError::DataRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}
