//! Input records, the resolved location table, and its CSV boundary.
//!
//! The input is any CSV with `id` and `name` columns (the legacy `nome`
//! header is accepted). The output table keeps the historical ISTAT export
//! headers; unresolved fields serialize as empty cells, never as zeroes,
//! since 0°/0° is a valid coordinate elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

/// One raw record from the location source. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
}

impl LocationRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One row of the resolved table — same order and cardinality as the input.
///
/// Hierarchy fields stay `None` for unclassified records; coordinates stay
/// `None` until enrichment or fallback fills them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    #[serde(rename = "Codice ISTAT")]
    pub id: String,
    #[serde(rename = "Codice Regione")]
    pub region_code: Option<String>,
    #[serde(rename = "Codice Provincia")]
    pub province_code: Option<String>,
    #[serde(rename = "Codice Comune")]
    pub commune_code: Option<String>,
    #[serde(rename = "Regione")]
    pub region_name: Option<String>,
    #[serde(rename = "Provincia")]
    pub province_name: Option<String>,
    #[serde(rename = "Comune")]
    pub commune_name: Option<String>,
    #[serde(rename = "Latitudine")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitudine")]
    pub longitude: Option<f64>,
}

impl ResolvedLocation {
    /// Fresh, fully unresolved row for an input record.
    pub fn from_record(record: &LocationRecord) -> Self {
        Self {
            id: record.id.clone(),
            ..Self::default()
        }
    }

    /// A row classified as a commune (the only level geocoded directly).
    pub fn is_commune(&self) -> bool {
        self.commune_name.is_some()
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Record store errors. Any of these is fatal: the pipeline must not start
/// on a malformed source.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Csv(String),
    MissingColumn(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Csv(msg) => write!(f, "CSV error: {}", msg),
            Self::MissingColumn(col) => {
                write!(f, "Input is missing the required '{}' column", col)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// Load the full record set, preserving input order.
///
/// The header row is validated before any record is read: a source without
/// `id` and `name`/`nome` columns aborts the run.
pub fn read_records(path: &Path) -> Result<Vec<LocationRecord>, StoreError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "id") {
        return Err(StoreError::MissingColumn("id"));
    }
    if !headers.iter().any(|h| h == "name" || h == "nome") {
        return Err(StoreError::MissingColumn("name"));
    }

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: LocationRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Write the enriched table, full-replace semantics: one row per input
/// record, in input order.
pub fn write_table<W: io::Write>(writer: W, table: &[ResolvedLocation]) -> Result<(), StoreError> {
    let mut out = csv::Writer::from_writer(writer);
    for row in table {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "id,name\nITC3,Liguria\n010025,Genova\n").unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], LocationRecord::new("ITC3", "Liguria"));
        assert_eq!(records[1].id, "010025");
    }

    #[test]
    fn test_read_records_legacy_nome_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "id,nome\nITC31,Genova\n").unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records[0].name, "Genova");
    }

    #[test]
    fn test_read_records_missing_id_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "code,name\nITC3,Liguria\n").unwrap();

        match read_records(&path) {
            Err(StoreError::MissingColumn("id")) => {}
            other => panic!("expected missing id column, got {:?}", other),
        }
    }

    #[test]
    fn test_read_records_missing_name_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "id,label\nITC3,Liguria\n").unwrap();

        match read_records(&path) {
            Err(StoreError::MissingColumn("name")) => {}
            other => panic!("expected missing name column, got {:?}", other),
        }
    }

    #[test]
    fn test_read_records_missing_file() {
        assert!(read_records(Path::new("/nonexistent/records.csv")).is_err());
    }

    #[test]
    fn test_write_table_empty_cells_for_unresolved() {
        let rows = vec![ResolvedLocation {
            id: "ITC".into(),
            ..Default::default()
        }];

        let mut buf = Vec::new();
        write_table(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Codice ISTAT,Codice Regione,Codice Provincia,Codice Comune,\
             Regione,Provincia,Comune,Latitudine,Longitudine"
        );
        // All unresolved fields stay empty, never 0.
        assert_eq!(lines.next().unwrap(), "ITC,,,,,,,,");
    }

    #[test]
    fn test_write_table_full_row() {
        let rows = vec![ResolvedLocation {
            id: "010025".into(),
            region_code: Some("ITC3".into()),
            province_code: Some("ITC31".into()),
            commune_code: Some("010025".into()),
            region_name: Some("Liguria".into()),
            province_name: Some("Genova".into()),
            commune_name: Some("Genova".into()),
            latitude: Some(44.4),
            longitude: Some(8.9),
        }];

        let mut buf = Vec::new();
        write_table(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("010025,ITC3,ITC31,010025,Liguria,Genova,Genova,44.4,8.9"));
    }

    #[test]
    fn test_from_record() {
        let row = ResolvedLocation::from_record(&LocationRecord::new("ITC31", "Genova"));
        assert_eq!(row.id, "ITC31");
        assert!(!row.is_commune());
        assert!(!row.has_coordinates());
    }
}
