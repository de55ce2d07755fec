//! Delimited text reading for imports.

use csv::ReaderBuilder;

use crate::errors::{Error, ValidationError};
use crate::Result;

/// Header and data rows of a decoded CSV file.
///
/// Every data row is padded to the header width. Rows are numbered by record,
/// 1-based with the header as row 1, so a quoted field spanning several lines
/// still counts as one row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl CsvTable {
    /// Case-insensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
    }
}

impl CsvRow {
    /// Trimmed cell value, empty for a missing column.
    pub fn cell(&self, index: Option<usize>) -> &str {
        index
            .and_then(|i| self.cells.get(i))
            .map(|c| c.trim())
            .unwrap_or("")
    }
}

/// Decodes `content` (UTF-8, optional BOM) and splits it into rows.
///
/// Row-level syntax errors become empty rows so that per-row validation can
/// report them; a missing header is a file-level error.
pub fn read_csv(content: &[u8], delimiter: u8) -> Result<CsvTable> {
    let text = decode_content(content)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(|h| h.trim().to_string()).collect(),
        Some(Err(e)) => {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Could not read the CSV header: {}",
                e
            ))))
        }
        None => {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "CSV file has no header row".to_string(),
            )))
        }
    };
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "CSV file has no header row".to_string(),
        )));
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for (index, result) in records.enumerate() {
        let number = index + 2;
        let mut cells = match result {
            Ok(record) => record.iter().map(str::to_string).collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        };
        if cells.iter().all(|c| c.trim().is_empty()) && !cells.is_empty() {
            continue;
        }
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        rows.push(CsvRow { number, cells });
    }

    Ok(CsvTable { headers, rows })
}

/// Strips a UTF-8 BOM and rejects anything that is not valid UTF-8.
fn decode_content(content: &[u8]) -> Result<&str> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    std::str::from_utf8(content).map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "CSV file must be UTF-8 encoded (invalid byte at position {})",
            e.valid_up_to()
        )))
    })
}
