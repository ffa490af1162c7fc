use burn::{config::Config as _, LearningRate};

use crate::error::{Error, Result};

/// The classifier's shape and the feature columns it was fitted on
#[derive(burn::config::Config)]
pub struct ModelConfig {
    /// Width of the encoded feature rows
    pub n_features: usize,

    /// Total number of classes
    pub n_classes: usize,

    /// Encoded column names, in the order the classifier expects them
    pub columns: Vec<String>,

    /// Weight of the squared L2 norm of the weights in the loss
    #[config(default = 0.0)]
    pub penalty: f64,
}

impl ModelConfig {
    /// Check that the declared width matches the declared columns
    pub fn validate(&self) -> Result<()> {
        if self.n_features != self.columns.len() {
            return Err(Error::Schema(format!(
                "model declares {} features but lists {} columns",
                self.n_features,
                self.columns.len()
            )));
        }

        if self.n_classes < 2 {
            return Err(Error::ClassCount(self.n_classes));
        }

        Ok(())
    }
}

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Training {
    /// Batch size
    #[config(default = 32)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 20)]
    pub num_epochs: usize,

    /// Adam learning rate
    #[config(default = 1e-2)]
    pub learning_rate: LearningRate,

    /// Inverse regularization strength; the weight norm is scaled by `1 / (2 * C * n_train)`
    #[config(default = 1.0)]
    pub c: f64,

    /// Share of the rows held out for evaluation
    #[config(default = 0.2)]
    pub test_size: f64,

    /// Seed for the partition and the data loader shuffle
    #[config(default = 42)]
    pub seed: u64,
}

impl Training {
    /// Load a training config from a JSON file, or fall back to the defaults when no path is given
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).map_err(|e| {
                Error::Configuration(format!("unable to load training config {path}: {e}"))
            }),
            None => Ok(Self::new()),
        }
    }

    /// Reject a test size outside (0, 1) and a `C` that is not positive and finite
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::Configuration(format!(
                "test size must be strictly between 0 and 1, found {}",
                self.test_size
            )));
        }

        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(Error::Configuration(format!(
                "C must be a positive number, found {}",
                self.c
            )));
        }

        Ok(())
    }

    /// The norm penalty equivalent to `C` for a training partition of `n_train` rows
    pub fn penalty(&self, n_train: usize) -> f64 {
        1.0 / (2.0 * self.c * n_train.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let config = Training::new();

        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.penalty(50), 0.01);
    }

    #[test]
    fn non_positive_c_is_rejected() {
        for c in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = Training::new().with_c(c);

            assert!(
                matches!(config.validate(), Err(Error::Configuration(_))),
                "{c}"
            );
        }

        assert!(Training::new().with_c(0.5).validate().is_ok());
    }

    #[test]
    fn test_size_must_leave_both_partitions() {
        for test_size in [0.0, 1.0, 1.5] {
            let config = Training::new().with_test_size(test_size);

            assert!(matches!(config.validate(), Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn model_config_must_list_every_column() {
        let config = ModelConfig::new(3, 2, vec!["POS_PROPN".to_string()]);

        assert!(matches!(config.validate(), Err(Error::Schema(_))));
    }

    #[test]
    fn model_config_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ModelConfig::new(2, 3, vec!["capitalized".into(), "in_club".into()])
            .with_penalty(0.5);
        config.save(&path).unwrap();

        let loaded = ModelConfig::load(&path).unwrap();
        assert_eq!(loaded.columns, config.columns);
        assert_eq!(loaded.penalty, 0.5);
        assert!(loaded.validate().is_ok());
    }
}
