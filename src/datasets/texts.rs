use std::path::Path;

use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::Table;

/// A single row of raw text to be tagged
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The raw text
    pub text: String,
}

/// Struct for a table of raw texts
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl Dataset {
    /// Loads the texts held in `column` of a CSV table
    pub fn load<P: AsRef<Path>>(path: P, column: &str) -> Result<Self> {
        let table = Table::from_csv(path.as_ref())?;

        let dataset = Self::from_texts(table.column(column)?);

        log::info!(
            "Loaded {} texts from {}",
            dataset.len(),
            path.as_ref().display()
        );

        Ok(dataset)
    }

    /// Builds the dataset from texts already in memory
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = texts.into_iter().map(|t| Item::new(t.into())).collect();

        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// All texts, in row order
    pub fn texts(&self) -> Vec<String> {
        self.dataset.iter().map(|item| item.text).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use burn::data::dataset::Dataset as _;
    use pretty_assertions::assert_eq;

    use crate::error::Error;

    use super::*;

    #[test]
    fn loads_the_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        fs::write(
            &path,
            "Text,Source\n\"Messi plays for Barcelona\",web\n\"Kane scored twice\",web\n",
        )
        .unwrap();

        let dataset = Dataset::load(&path, "Text").unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.texts(),
            vec!["Messi plays for Barcelona", "Kane scored twice"]
        );
    }

    #[test]
    fn missing_text_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_data.csv");
        fs::write(&path, "Body\nhello\n").unwrap();

        let result = Dataset::load(&path, "Text");

        assert!(matches!(result, Err(Error::MissingColumn { .. })));
    }
}
