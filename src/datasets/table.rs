use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// A CSV table held in memory, with access to its columns by header name
#[derive(Clone, Debug)]
pub struct Table {
    /// Where the table was read from, for error reporting
    path: PathBuf,

    /// Header names, in file order
    headers: Vec<String>,

    /// Data rows
    records: Vec<csv::StringRecord>,
}

impl Table {
    /// Read a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        log::debug!("Read {} rows from {}", records.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    /// Header names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of a named column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let index = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })?;

        Ok(self
            .records
            .iter()
            .map(|record| record.get(index).unwrap_or_default().to_string())
            .collect())
    }

    /// The distinct non-empty values of a named column, in order of first appearance
    pub fn distinct(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();

        Ok(self
            .column(name)?
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .filter(|value| seen.insert(value.clone()))
            .collect())
    }
}
