//! CSV ingestion into headers plus raw, untyped records.

use csv::{ReaderBuilder, Trim};
use std::io::Read;
use tracing::debug;

/// One input row as text cells, tagged with its line in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    cells: Vec<String>,
}

impl RawRecord {
    pub fn new(line: u64, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// Cell at `index`; rows shorter than the header row read as blank.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Header row and every data row of a delimited file.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Reads comma-separated text with a header row.
///
/// Rows may be ragged; missing trailing cells are treated as blank.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        records.push(RawRecord::new(line, record.iter().map(str::to_string).collect()));
    }

    debug!(columns = headers.len(), rows = records.len(), "CSV read");
    Ok(RawTable { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table_keeps_headers_and_lines() {
        let data = "Date,Platform\n2023-01-01,Twitter\n2023-01-02,Facebook\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["Date", "Platform"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].cell(1), "Facebook");
    }

    #[test]
    fn test_short_rows_read_as_blank_cells() {
        let data = "a,b,c\n1,2\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.records[0].cell(1), "2");
        assert_eq!(table.records[0].cell(2), "");
        assert_eq!(table.records[0].cell(9), "");
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let data = "Location,Engagements\n\"Jakarta, ID\",\"1,234\"\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.records[0].cell(0), "Jakarta, ID");
        assert_eq!(table.records[0].cell(1), "1,234");
    }

    #[test]
    fn test_empty_lines_are_ignored_but_blank_cells_are_kept() {
        let data = "a,b\n1,2\n\n,\n3,4\n";
        let table = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[1].cell(0), "");
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let table = read_table("".as_bytes()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.records.is_empty());
    }
}
