use std::path::Path;

use burn::{data::dataloader::batcher::Batcher as _, tensor::backend::Backend};

use crate::{
    annotation::Annotator,
    config::Layout,
    datasets::texts,
    encoding::FeatureMatrix,
    error::{Error, Result},
    features::{io, Extractor, TokenRecord},
};

use super::{
    batcher::Infer,
    bundle::{self, Bundle},
    Batcher, LabelEncoder,
};

/// Applies a persisted bundle to new token records
pub struct Predictor<B: Backend> {
    /// The fitted encoder and classifier
    bundle: Bundle<B>,

    /// The label encoding fitted at training time
    labels: LabelEncoder,

    /// Batcher for the classifier's input width
    batcher: Batcher<B>,
}

impl<B: Backend> Predictor<B> {
    /// Load the bundle and the label encoding stored in `dir`
    pub fn load<P: AsRef<Path>>(dir: P, device: B::Device) -> Result<Self> {
        let dir = dir.as_ref();

        let labels = LabelEncoder::load(bundle::labels_path(dir))?;
        let bundle = Bundle::<B>::load(dir, &device)?;

        if labels.len() != bundle.config.n_classes {
            return Err(Error::Schema(format!(
                "label encoding holds {} classes but the classifier predicts {}",
                labels.len(),
                bundle.config.n_classes
            )));
        }

        let batcher = Batcher::new(bundle.config.n_features, bundle.config.n_classes, device);

        Ok(Self {
            bundle,
            labels,
            batcher,
        })
    }

    /// The label encoding fitted at training time
    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    /// The columns the classifier expects, in order
    pub fn columns(&self) -> &[String] {
        &self.bundle.config.columns
    }

    /// Encode records with the persisted encoder and reconcile the result with the classifier's
    /// expected columns
    pub fn encode(&self, records: &[TokenRecord]) -> Result<FeatureMatrix> {
        let encoded = self.bundle.encoder.transform(records)?;

        self.reconcile(&encoded)
    }

    /// Rearrange a matrix to the classifier's columns: expected columns it lacks are added as
    /// zeros, columns the classifier never learned are dropped.
    pub fn reconcile(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        let (reconciled, drift) = matrix.reconcile(self.columns());

        if !drift.missing.is_empty() {
            log::warn!(
                "{} expected columns are missing and were filled with zeros: {:?}",
                drift.missing.len(),
                drift.missing
            );
        }

        if !drift.ignored.is_empty() {
            log::warn!(
                "{} columns are unknown to the classifier and were dropped: {:?}",
                drift.ignored.len(),
                drift.ignored
            );
        }

        self.check_width(&reconciled)?;

        Ok(reconciled)
    }

    fn check_width(&self, matrix: &FeatureMatrix) -> Result<()> {
        let expected = self.bundle.model.n_features();

        if matrix.n_cols() != expected {
            return Err(Error::Schema(format!(
                "matrix has {} columns but the classifier expects {}",
                matrix.n_cols(),
                expected
            )));
        }

        Ok(())
    }

    /// Predict one label per row of an already reconciled matrix
    pub fn predict_matrix(&self, matrix: &FeatureMatrix) -> Result<Vec<String>> {
        self.check_width(matrix)?;

        if matrix.n_rows() == 0 {
            return Ok(Vec::new());
        }

        let input: Infer<B> = self
            .batcher
            .batch(matrix.rows().map(<[f32]>::to_vec).collect());

        let class_ids = self.bundle.model.predict(input);

        self.labels.decode(&class_ids)
    }

    /// Predict one label per token record
    pub fn predict(&self, records: &[TokenRecord]) -> Result<Vec<String>> {
        self.predict_matrix(&self.encode(records)?)
    }
}

/// Token records of the new texts with their predicted labels, row-aligned
#[derive(Clone, Debug)]
pub struct Predictions {
    /// One record per token, in input order
    pub records: Vec<TokenRecord>,

    /// One predicted label per record
    pub labels: Vec<String>,
}

impl Predictions {
    /// Pairs of token text and predicted label
    pub fn tagged(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records
            .iter()
            .zip(&self.labels)
            .map(|(record, label)| (record.token.as_str(), label.as_str()))
    }
}

/// Run every prediction stage over the layout: load the bundle, extract and encode the new
/// texts, and predict their labels.
///
/// With `save`, the extracted records, the reconciled matrix and the records with a `predicted`
/// column are written next to the new texts.
pub fn run<B, A>(layout: &Layout, annotator: A, device: B::Device, save: bool) -> Result<Predictions>
where
    B: Backend,
    A: Annotator,
{
    let predictor = Predictor::<B>::load(layout.model(), device)?;
    let extractor = Extractor::from_artifact(layout.vocabulary(), annotator)?;

    let dataset = texts::Dataset::load(layout.new_data(), &layout.text_column)?;
    let records = extractor.extract(dataset.texts())?;

    let matrix = predictor.encode(&records)?;
    let labels = predictor.predict_matrix(&matrix)?;

    if save {
        io::write_records(layout.new_extracted_features(), &records)?;
        matrix.write_csv(layout.new_processed_features())?;
        io::write_predictions(layout.predictions(), &records, &labels)?;
    }

    log::info!("Predicted labels for {} tokens", labels.len());

    Ok(Predictions { records, labels })
}
