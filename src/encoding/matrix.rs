use std::{collections::HashMap, fs, path::Path};

use crate::{
    datasets::Table,
    error::{Error, Result},
};

/// A dense, row-major numeric matrix with named columns
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    /// Column names, in order
    columns: Vec<String>,

    /// Row-major values
    values: Vec<f32>,

    /// Number of rows
    n_rows: usize,
}

/// Columns added and dropped while reconciling a matrix with an expected schema
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Drift {
    /// Expected columns the matrix lacked; filled with zeros
    pub missing: Vec<String>,

    /// Columns of the matrix the schema does not know; dropped
    pub ignored: Vec<String>,
}

impl Drift {
    /// Whether the matrix already matched the schema
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.ignored.is_empty()
    }
}

impl FeatureMatrix {
    /// Creates a matrix from row-major values
    pub fn new(columns: Vec<String>, values: Vec<f32>) -> Result<Self> {
        let n_cols = columns.len();

        let n_rows = match (n_cols, values.len()) {
            (0, 0) => 0,
            (0, _) => {
                return Err(Error::Schema(
                    "a matrix without columns cannot hold values".to_string(),
                ))
            }
            (_, len) if len % n_cols != 0 => {
                return Err(Error::Schema(format!(
                    "{len} values do not fill rows of {n_cols} columns"
                )))
            }
            (_, len) => len / n_cols,
        };

        Ok(Self {
            columns,
            values,
            n_rows,
        })
    }

    /// An empty matrix with the given columns
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            values: Vec::new(),
            n_rows: 0,
        }
    }

    /// Column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// A single row
    pub fn row(&self, index: usize) -> &[f32] {
        let n_cols = self.n_cols();
        &self.values[index * n_cols..(index + 1) * n_cols]
    }

    /// All rows, in order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.n_rows).map(|i| self.row(i))
    }

    /// Row-major values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// All values of a named column
    pub fn column(&self, name: &str) -> Option<Vec<f32>> {
        let index = self.columns.iter().position(|c| c == name)?;

        Some(self.rows().map(|row| row[index]).collect())
    }

    /// A new matrix holding the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let values = indices
            .iter()
            .flat_map(|&i| self.row(i).iter().copied())
            .collect();

        Self {
            columns: self.columns.clone(),
            values,
            n_rows: indices.len(),
        }
    }

    /// Rearrange the matrix to exactly the `expected` columns, in their order.
    ///
    /// Expected columns missing from the matrix are filled with zeros; columns the schema does
    /// not know are dropped.
    pub fn reconcile(&self, expected: &[String]) -> (Self, Drift) {
        let positions: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let sources: Vec<Option<usize>> = expected
            .iter()
            .map(|name| positions.get(name.as_str()).copied())
            .collect();

        let missing = expected
            .iter()
            .zip(&sources)
            .filter(|(_, source)| source.is_none())
            .map(|(name, _)| name.clone())
            .collect();

        let known: std::collections::HashSet<&str> =
            expected.iter().map(String::as_str).collect();

        let ignored = self
            .columns
            .iter()
            .filter(|name| !known.contains(name.as_str()))
            .cloned()
            .collect();

        let mut values = Vec::with_capacity(self.n_rows * expected.len());
        for row in self.rows() {
            values.extend(sources.iter().map(|source| source.map_or(0.0, |i| row[i])));
        }

        let reconciled = Self {
            columns: expected.to_vec(),
            values,
            n_rows: self.n_rows,
        };

        (reconciled, Drift { missing, ignored })
    }

    /// Write the matrix as a CSV table with one header per column
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;

        for row in self.rows() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;

        log::info!("Processed features are saved to '{}'", path.display());

        Ok(())
    }

    /// Read a matrix written by [`FeatureMatrix::write_csv`]
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = Table::from_csv(path)?;

        let columns = table.headers().to_vec();
        let parsed = columns
            .iter()
            .map(|name| {
                table.column(name)?
                    .iter()
                    .map(|cell| {
                        cell.trim().parse::<f32>().map_err(|e| {
                            Error::Schema(format!(
                                "non-numeric value '{cell}' in column {name} of {}: {e}",
                                path.display()
                            ))
                        })
                    })
                    .collect::<Result<Vec<f32>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let values = (0..table.len())
            .flat_map(|row| parsed.iter().map(move |column| column[row]))
            .collect();

        Self::new(columns, values)
    }
}
