//! Token classification with a linear support-vector machine over encoded token features

/// Batcher
pub mod batcher;

/// Persisted encoder and classifier
pub mod bundle;

/// Model and training configuration
pub mod config;

/// Token Classification Items
pub mod item;

/// Label encoding
pub mod labels;

/// Linear SVM
pub mod model;

/// Held-out metrics
pub mod report;

/// Reproducible train / held-out partition
pub mod split;

/// Token Classification Training
pub mod training;

/// Token Classification Inference
pub mod inference;

pub use batcher::Batcher;
pub use bundle::Bundle;
pub use config::ModelConfig;
pub use inference::{Predictions, Predictor};
pub use item::Item;
pub use labels::LabelEncoder;
pub use model::Model;
pub use report::ClassificationReport;
pub use training::{train, Config, Trained};
