use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maps chunk labels to contiguous class ids, sorted by label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Persisted", into = "Persisted")]
pub struct LabelEncoder {
    /// A mapping from class ids to class name labels
    id2label: Vec<String>,

    /// A mapping from class name labels to class ids
    label2id: BTreeMap<String, usize>,
}

/// On-disk form: the class labels in id order
#[derive(Serialize, Deserialize)]
struct Persisted {
    classes: Vec<String>,
}

impl From<Persisted> for LabelEncoder {
    fn from(persisted: Persisted) -> Self {
        Self::fit(persisted.classes)
    }
}

impl From<LabelEncoder> for Persisted {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.id2label,
        }
    }
}

impl LabelEncoder {
    /// Learn the sorted set of distinct labels
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label2id: BTreeMap<String, usize> = labels
            .into_iter()
            .map(|label| (label.into(), 0))
            .collect::<BTreeMap<_, _>>()
            .into_keys()
            .enumerate()
            .map(|(id, label)| (label, id))
            .collect();

        let id2label = label2id.keys().cloned().collect();

        Self { id2label, label2id }
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.id2label.len()
    }

    /// Whether no labels were seen
    pub fn is_empty(&self) -> bool {
        self.id2label.is_empty()
    }

    /// Class labels in id order
    pub fn classes(&self) -> &[String] {
        &self.id2label
    }

    /// The id of a label
    pub fn id(&self, label: &str) -> Option<usize> {
        self.label2id.get(label).copied()
    }

    /// The label of an id
    pub fn label(&self, id: usize) -> Option<&str> {
        self.id2label.get(id).map(String::as_str)
    }

    /// Ids for a list of labels; every label must be known
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                self.id(label.as_ref()).ok_or_else(|| {
                    Error::Schema(format!("label '{}' was not seen in training", label.as_ref()))
                })
            })
            .collect()
    }

    /// Labels for a list of ids; every id must be in range
    pub fn decode(&self, ids: &[usize]) -> Result<Vec<String>> {
        ids.iter()
            .map(|&id| {
                self.label(id).map(String::from).ok_or_else(|| {
                    Error::Schema(format!("class id {id} is outside the {} classes", self.len()))
                })
            })
            .collect()
    }

    /// Persist the label encoding as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;

        log::info!("Label encoding is saved to '{}'", path.display());

        Ok(())
    }

    /// Load a persisted label encoding
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
