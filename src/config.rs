use std::path::{Path, PathBuf};

use burn::config::Config as _;

use crate::{
    error::{Error, Result},
    vocabulary::Category,
};

/// Locations of every artifact read or written by the pipeline stages
#[derive(burn::config::Config)]
pub struct Layout {
    /// The top-level directory holding the raw tables
    #[config(default = "\"data\".to_string()")]
    pub data_dir: String,

    /// Where intermediate artifacts (vocabulary, extracted and processed features) are written
    #[config(default = "\"processed_data\".to_string()")]
    pub processed_dir: String,

    /// Where the trained bundle and the label encoding are written
    #[config(default = "\"model\".to_string()")]
    pub model_dir: String,

    /// Where new texts are read from and prediction artifacts are written to
    #[config(default = "\"input\".to_string()")]
    pub input_dir: String,

    /// The table holding the training texts, relative to `data_dir`
    #[config(default = "\"training_data.csv\".to_string()")]
    pub training_file: String,

    /// The table holding texts to predict, relative to `input_dir`
    #[config(default = "\"new_data.csv\".to_string()")]
    pub new_data_file: String,

    /// The column holding raw text in the training and prediction tables
    #[config(default = "\"Text\".to_string()")]
    pub text_column: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Load a layout from a JSON file, or fall back to the defaults when no path is given
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path)
                .map_err(|e| Error::Configuration(format!("unable to load layout {path}: {e}"))),
            None => Ok(Self::default()),
        }
    }

    /// The source table for a vocabulary category
    pub fn category_table(&self, category: Category) -> PathBuf {
        Path::new(&self.data_dir).join(category.default_table())
    }

    /// The training texts
    pub fn training_data(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.training_file)
    }

    /// The serialized vocabulary
    pub fn vocabulary(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("popular_words.json")
    }

    /// Token records extracted from the training texts
    pub fn extracted_features(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("extracted_features.csv")
    }

    /// The encoded training matrix
    pub fn processed_features(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("processed_features.csv")
    }

    /// The directory holding the trained bundle
    pub fn model(&self) -> PathBuf {
        PathBuf::from(&self.model_dir)
    }

    /// New texts to predict
    pub fn new_data(&self) -> PathBuf {
        Path::new(&self.input_dir).join(&self.new_data_file)
    }

    /// Token records extracted from the new texts
    pub fn new_extracted_features(&self) -> PathBuf {
        Path::new(&self.input_dir).join("extracted_features_new_data.csv")
    }

    /// The encoded matrix of the new texts
    pub fn new_processed_features(&self) -> PathBuf {
        Path::new(&self.input_dir).join("processed_features_new_data.csv")
    }

    /// The exploded new texts with their predicted labels
    pub fn predictions(&self) -> PathBuf {
        Path::new(&self.input_dir).join("predictions.csv")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_the_documented_layout() {
        let layout = Layout::default();

        assert_eq!(layout.vocabulary(), PathBuf::from("processed_data/popular_words.json"));
        assert_eq!(layout.training_data(), PathBuf::from("data/training_data.csv"));
        assert_eq!(layout.model(), PathBuf::from("model"));
        assert_eq!(
            layout.category_table(Category::Players),
            PathBuf::from("data/player.csv")
        );
        assert_eq!(layout.predictions(), PathBuf::from("input/predictions.csv"));
    }

    #[test]
    fn layout_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");

        let layout = Layout::new().with_model_dir("artifacts/svm".to_string());
        layout.save(&path).unwrap();

        let loaded = Layout::load_or_default(path.to_str()).unwrap();
        assert_eq!(loaded.model(), PathBuf::from("artifacts/svm"));
        assert_eq!(loaded.text_column, "Text");
    }

    #[test]
    fn missing_layout_file_is_a_configuration_error() {
        let result = Layout::load_or_default(Some("does/not/exist.json"));

        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
