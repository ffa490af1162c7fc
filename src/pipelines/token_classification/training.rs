use std::{fs, path::Path};

use burn::{
    data::{
        dataloader::{batcher::Batcher as _, DataLoaderBuilder},
        dataset::InMemDataset,
    },
    module::AutodiffModule,
    optim::AdamConfig,
    record::CompactRecorder,
    tensor::backend::AutodiffBackend,
    train::{
        metric::{AccuracyMetric, LearningRateMetric, LossMetric},
        LearnerBuilder,
    },
};

use crate::{
    annotation::Annotator,
    config::Layout,
    datasets::texts,
    encoding::{FeatureEncoder, FeatureMatrix},
    error::{Error, Result},
    features::{io, Extractor},
    utils::renderer::Simple,
};

use super::{
    batcher::Infer,
    bundle::{self, Bundle},
    item, split, Batcher, ClassificationReport, LabelEncoder, ModelConfig,
};

/// Training Config
pub type Config = super::config::Training;

/// What a training run leaves behind besides its artifacts
#[derive(Clone, Debug)]
pub struct Trained {
    /// The fitted label encoding
    pub labels: LabelEncoder,

    /// Metrics over the held-out partition
    pub report: ClassificationReport,
}

/// Fit the classifier on an encoded matrix and its labels, evaluate it on a held-out partition,
/// and persist the bundle and the label encoding into `artifact_dir`.
#[allow(clippy::too_many_arguments)]
pub fn train<B: AutodiffBackend>(
    devices: Vec<B::Device>, // Device on which to perform computation (e.g., CPU or CUDA device)
    encoder: &FeatureEncoder, // The encoder that produced `matrix`
    matrix: &FeatureMatrix,  // One encoded row per token
    labels: &[String],       // One label per row
    config: &Config,         // Experiment configuration
    artifact_dir: &Path,     // Directory to save the bundle and the label encoding
    use_tui: bool,           // Draw the terminal dashboard while fitting
) -> Result<Trained> {
    if matrix.n_rows() != labels.len() {
        return Err(Error::Schema(format!(
            "{} feature rows but {} labels",
            matrix.n_rows(),
            labels.len()
        )));
    }

    config.validate()?;

    let label_encoder = LabelEncoder::fit(labels);
    let n_classes = label_encoder.len();

    if n_classes < 2 {
        return Err(Error::ClassCount(n_classes));
    }

    let device = devices
        .first()
        .cloned()
        .ok_or_else(|| Error::Configuration("no training device was given".to_string()))?;

    let class_ids = label_encoder.encode(labels)?;
    let partition = split::train_test_split(matrix.n_rows(), config.test_size, config.seed);

    log::info!(
        "Training on {} rows, holding out {} ({} features, {} classes)",
        partition.train.len(),
        partition.test.len(),
        matrix.n_cols(),
        n_classes
    );

    let model_config = ModelConfig::new(matrix.n_cols(), n_classes, matrix.columns().to_vec())
        .with_penalty(config.penalty(partition.train.len()));

    let model = model_config.init::<B>(&device);

    // Initialize batchers for training and held-out data
    let batcher_train = Batcher::<B>::new(matrix.n_cols(), n_classes, device.clone());
    let batcher_test = Batcher::<B::InnerBackend>::new(matrix.n_cols(), n_classes, device);

    let dataset_train = InMemDataset::new(item::items(matrix, &class_ids, &partition.train));
    let dataset_test = InMemDataset::new(item::items(matrix, &class_ids, &partition.test));

    // Initialize data loaders for training and held-out data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test.clone())
        .batch_size(config.batch_size)
        .build(dataset_test);

    fs::create_dir_all(artifact_dir)?;
    let directory = artifact_dir.to_string_lossy().into_owned();

    // Initialize learner
    let mut builder = LearnerBuilder::new(&directory)
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(devices)
        .num_epochs(config.num_epochs)
        .summary();

    if !use_tui {
        builder = builder.renderer(Simple::new());
    }

    let learner = builder.build(model, AdamConfig::new().init(), config.learning_rate);

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_test).valid();

    // Evaluate on the held-out rows
    let held_out = matrix.select_rows(&partition.test);
    let input: Infer<B::InnerBackend> =
        batcher_test.batch(held_out.rows().map(<[f32]>::to_vec).collect());

    let truth: Vec<usize> = partition.test.iter().map(|&row| class_ids[row]).collect();
    let predicted = model_trained.predict(input);

    let report = ClassificationReport::new(label_encoder.classes(), &truth, &predicted);

    log::info!("Held-out accuracy: {:.4}", report.accuracy);

    // Save the bundle and the label encoding
    Bundle {
        encoder: encoder.clone(),
        config: model_config,
        model: model_trained,
    }
    .save(artifact_dir)?;

    label_encoder.save(bundle::labels_path(artifact_dir))?;

    Ok(Trained {
        labels: label_encoder,
        report,
    })
}

/// Run every training stage over the layout: extract records from the training texts,
/// encode them, and fit the classifier on their chunk labels.
pub fn run<B, A>(
    layout: &Layout,
    annotator: A,
    config: &Config,
    devices: Vec<B::Device>,
    use_tui: bool,
) -> Result<Trained>
where
    B: AutodiffBackend,
    A: Annotator,
{
    let extractor = Extractor::from_artifact(layout.vocabulary(), annotator)?;

    let dataset = texts::Dataset::load(layout.training_data(), &layout.text_column)?;
    let records = extractor.extract(dataset.texts())?;

    io::write_records(layout.extracted_features(), &records)?;

    let (encoder, matrix) = FeatureEncoder::fit_transform(&records)?;
    matrix.write_csv(layout.processed_features())?;

    let labels: Vec<String> = records.iter().map(|r| r.is_chunk.clone()).collect();

    train::<B>(
        devices,
        &encoder,
        &matrix,
        &labels,
        config,
        &layout.model(),
        use_tui,
    )
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    use crate::features::TokenRecord;

    use super::*;

    type Backend = Autodiff<NdArray>;

    fn matrix(n_rows: usize) -> FeatureMatrix {
        let columns = vec!["capitalized".to_string(), "in_player".to_string()];
        let values = (0..n_rows * 2).map(|i| (i % 2) as f32).collect();

        FeatureMatrix::new(columns, values).unwrap()
    }

    fn fit(matrix: &FeatureMatrix, labels: &[String], config: &Config) -> Result<Trained> {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FeatureEncoder::fit(&Vec::<TokenRecord>::new());

        train::<Backend>(
            vec![NdArrayDevice::Cpu],
            &encoder,
            matrix,
            labels,
            config,
            dir.path(),
            false,
        )
    }

    #[test]
    fn a_single_label_is_a_class_count_error() {
        let labels = vec!["O".to_string(); 5];

        let result = fit(&matrix(5), &labels, &Config::new());

        assert!(matches!(result, Err(Error::ClassCount(1))));
    }

    #[test]
    fn label_count_must_match_rows() {
        let labels = vec!["B".to_string(), "O".to_string(), "O".to_string()];

        let result = fit(&matrix(5), &labels, &Config::new());

        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn non_positive_c_fails_before_fitting() {
        let labels: Vec<String> = ["B", "O", "O", "I", "O"].map(String::from).to_vec();

        let result = fit(&matrix(5), &labels, &Config::new().with_c(0.0));

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn missing_device_is_a_configuration_error() {
        let labels: Vec<String> = ["B", "O"].map(String::from).to_vec();
        let encoder = FeatureEncoder::fit(&Vec::<TokenRecord>::new());
        let dir = tempfile::tempdir().unwrap();

        let result = train::<Backend>(
            Vec::new(),
            &encoder,
            &matrix(2),
            &labels,
            &Config::new(),
            dir.path(),
            false,
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
