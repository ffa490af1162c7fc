use std::{
    fs,
    path::{Path, PathBuf},
};

use burn::{
    config::Config as _,
    module::Module,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
    tensor::backend::Backend,
};

use crate::{
    encoding::FeatureEncoder,
    error::{Error, Result},
};

use super::{Model, ModelConfig};

/// File name of the classifier configuration within a bundle directory
pub static CONFIG: &str = "config.json";

/// File name of the fitted feature encoder within a bundle directory
pub static ENCODER: &str = "encoder.json";

/// Stem of the classifier weights within a bundle directory; the recorder adds `.mpk.gz`
pub static WEIGHTS: &str = "model";

/// File name of the label encoding next to the bundle
pub static LABELS: &str = "label_encoder.json";

/// The fitted encoder and classifier, persisted and restored together
pub struct Bundle<B: Backend> {
    /// The feature encoder fitted on the training records
    pub encoder: FeatureEncoder,

    /// The classifier's shape and expected columns
    pub config: ModelConfig,

    /// The trained classifier
    pub model: Model<B>,
}

/// Path of the label encoding stored alongside a bundle
pub fn labels_path(dir: &Path) -> PathBuf {
    dir.join(LABELS)
}

fn weights_path(dir: &Path) -> PathBuf {
    dir.join(format!("{WEIGHTS}.mpk.gz"))
}

impl<B: Backend> Bundle<B> {
    /// Write the bundle into `dir`, replacing any previous one
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;

        self.config.save(dir.join(CONFIG))?;
        self.encoder.save(dir.join(ENCODER))?;

        NamedMpkGzFileRecorder::<FullPrecisionSettings>::new()
            .record(self.model.clone().into_record(), dir.join(WEIGHTS))
            .map_err(|e| Error::Record(format!("{e:?}")))?;

        log::info!("Model bundle is saved to '{}'", dir.display());

        Ok(())
    }

    /// Restore a bundle from `dir`
    pub fn load(dir: &Path, device: &B::Device) -> Result<Self> {
        for path in [dir.join(CONFIG), dir.join(ENCODER), weights_path(dir)] {
            if !path.exists() {
                return Err(Error::ArtifactNotFound(path));
            }
        }

        let config = ModelConfig::load(dir.join(CONFIG)).map_err(|e| {
            Error::Configuration(format!("unable to load model config in {}: {e}", dir.display()))
        })?;
        config.validate()?;

        let encoder = FeatureEncoder::load(dir.join(ENCODER))?;

        if encoder.n_columns() != config.n_features {
            return Err(Error::Schema(format!(
                "encoder produces {} columns but the classifier expects {}",
                encoder.n_columns(),
                config.n_features
            )));
        }

        let record = NamedMpkGzFileRecorder::<FullPrecisionSettings>::new()
            .load(dir.join(WEIGHTS), device)
            .map_err(|e| Error::Record(format!("{e:?}")))?;

        let model = config.init::<B>(device).load_record(record);

        log::debug!(
            "Loaded bundle from '{}': {} features, {} classes",
            dir.display(),
            config.n_features,
            config.n_classes
        );

        Ok(Self {
            encoder,
            config,
            model,
        })
    }
}
