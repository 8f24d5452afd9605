//! Synthetic (mock) star catalogs.
//!
//! The background-density estimate counts stars from a mock catalog of the
//! field population. The catalog is a columnar table with named `g` and `r`
//! apparent-magnitude columns, read once per estimate and never mutated.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading a mock catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open mock catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Missing column, malformed row, or non-numeric magnitude
    #[error("failed to parse mock catalog: {0}")]
    Parse(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct MockRow {
    g: f64,
    r: f64,
}

/// A mock catalog: parallel per-band apparent-magnitude columns.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// g-band apparent magnitudes
    pub g: Vec<f64>,
    /// r-band apparent magnitudes
    pub r: Vec<f64>,
}

impl MockCatalog {
    /// Number of stars in the catalog.
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Stars as (g, r) magnitude pairs.
    pub fn stars(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.g.iter().copied().zip(self.r.iter().copied())
    }
}

/// Read a mock catalog from a headered CSV file with `g` and `r` columns.
///
/// Extra columns are ignored; a missing magnitude column or a non-numeric
/// value fails the whole read.
pub fn read_mock_catalog<P: AsRef<Path>>(path: P) -> Result<MockCatalog, CatalogError> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);

    let mut catalog = MockCatalog::default();
    for row in reader.deserialize() {
        let row: MockRow = row?;
        catalog.g.push(row.g);
        catalog.r.push(row.r);
    }

    debug!(
        "read mock catalog {} ({} stars)",
        path.as_ref().display(),
        catalog.len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_catalog() {
        let file = write_catalog("g,r\n20.5,20.0\n21.5,21.1\n");
        let catalog = read_mock_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.stars().next(), Some((20.5, 20.0)));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let file = write_catalog("ra,dec,g,r\n10.0,-5.0,20.5,20.0\n");
        let catalog = read_mock_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.r[0], 20.0);
    }

    #[test]
    fn test_missing_column_is_error() {
        let file = write_catalog("g,i\n20.5,19.0\n");
        assert!(matches!(
            read_mock_catalog(file.path()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_non_numeric_magnitude_is_error() {
        let file = write_catalog("g,r\n20.5,bright\n");
        assert!(matches!(
            read_mock_catalog(file.path()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            read_mock_catalog("/nonexistent/mock.csv"),
            Err(CatalogError::Io(_))
        ));
    }
}
