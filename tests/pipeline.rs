use std::{fs, path::Path};

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use football_ner::{
    annotation::Rules,
    config::Layout,
    encoding::{FeatureEncoder, FeatureMatrix},
    error::Error,
    features::Extractor,
    pipelines::token_classification::{bundle, inference, training, Predictor},
    vocabulary::{export_popular_words, Category, Source, Vocabulary},
};
use pretty_assertions::assert_eq;

type Train = Autodiff<NdArray>;
type Infer = NdArray;

const TRAINING_TEXTS: [&str; 8] = [
    "Lionel Messi scored twice for Barcelona in La Liga.",
    "Erling Haaland joined Manchester City from Dortmund.",
    "Pep Guardiola praised the defence after the match.",
    "Spain won the tournament in Europe.",
    "Kylian Mbappe signed for Real Madrid last summer.",
    "The coach said the team played well.",
    "Arsenal beat Chelsea at the Emirates Stadium.",
    "Brazil and Argentina meet again in South America.",
];

const NEW_TEXTS: [&str; 2] = [
    "Jude Bellingham starred for England.",
    "the fans sang loudly.",
];

fn write_csv(path: &Path, header: &str, rows: &[&str]) {
    let mut contents = format!("{header}\n");
    for row in rows {
        contents.push_str(&format!("\"{row}\"\n"));
    }

    fs::write(path, contents).unwrap();
}

fn layout(root: &Path) -> Layout {
    let path = |name: &str| root.join(name).to_string_lossy().into_owned();

    let layout = Layout::new()
        .with_data_dir(path("data"))
        .with_processed_dir(path("processed_data"))
        .with_model_dir(path("model"))
        .with_input_dir(path("input"));

    fs::create_dir_all(&layout.data_dir).unwrap();
    fs::create_dir_all(&layout.input_dir).unwrap();

    let tables: [(Category, &[&str]); 7] = [
        (Category::Leagues, &["La", "Liga", "Premier"]),
        (Category::Clubs, &["Barcelona", "Arsenal", "Chelsea", "Madrid"]),
        (Category::Homes, &["Manchester", "Emirates"]),
        (Category::Players, &["Messi", "Haaland", "Mbappe"]),
        (Category::Coaches, &["Guardiola"]),
        (Category::Nations, &["Spain", "Brazil", "Argentina"]),
        (Category::Continents, &["Europe", "America"]),
    ];

    for (category, words) in tables {
        write_csv(
            &layout.category_table(category),
            category.source_column(),
            words,
        );
    }

    write_csv(&layout.training_data(), "Text", &TRAINING_TEXTS);
    write_csv(&layout.new_data(), "Text", &NEW_TEXTS);

    layout
}

fn training_config() -> training::Config {
    training::Config::new()
        .with_num_epochs(2)
        .with_batch_size(8)
}

#[test]
fn train_then_predict_over_a_layout() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path());

    let vocabulary =
        export_popular_words(&Source::from_layout(&layout), layout.vocabulary()).unwrap();
    assert!(vocabulary.contains(Category::Players, "Messi"));
    assert!(layout.vocabulary().exists());

    let trained = training::run::<Train, _>(
        &layout,
        Rules,
        &training_config(),
        vec![NdArrayDevice::Cpu],
        false,
    )
    .unwrap();

    assert!(trained.labels.len() >= 2);
    assert!(trained.report.weighted_avg.support > 0);
    assert!(trained.report.accuracy >= 0.0 && trained.report.accuracy <= 1.0);

    let model_dir = layout.model();
    for artifact in [bundle::CONFIG, bundle::ENCODER, "model.mpk.gz"] {
        assert!(model_dir.join(artifact).exists(), "missing {artifact}");
    }
    assert!(bundle::labels_path(&model_dir).exists());
    assert!(layout.extracted_features().exists());
    assert!(layout.processed_features().exists());

    // Prediction over the layout writes its artifacts next to the new texts
    let predictions = inference::run::<Infer, _>(&layout, Rules, NdArrayDevice::Cpu, true).unwrap();

    assert_eq!(predictions.records.len(), predictions.labels.len());
    assert!(!predictions.labels.is_empty());
    for (_, label) in predictions.tagged() {
        assert!(trained.labels.classes().iter().any(|class| class == label));
    }
    assert!(layout.new_extracted_features().exists());
    assert!(layout.new_processed_features().exists());
    assert!(layout.predictions().exists());

    // The reconciled matrix always has the classifier's width
    let predictor = Predictor::<Infer>::load(&model_dir, NdArrayDevice::Cpu).unwrap();
    let extractor = Extractor::from_artifact(layout.vocabulary(), Rules).unwrap();
    let records = extractor.extract(NEW_TEXTS).unwrap();

    let matrix = predictor.encode(&records).unwrap();
    assert_eq!(matrix.n_cols(), predictor.columns().len());
    assert_eq!(matrix.n_rows(), records.len());

    let saved = FeatureMatrix::read_csv(layout.new_processed_features()).unwrap();
    assert_eq!(saved.columns(), matrix.columns());

    // An empty batch predicts nothing
    let empty = FeatureMatrix::empty(predictor.columns().to_vec());
    assert_eq!(predictor.predict_matrix(&empty).unwrap(), Vec::<String>::new());

    // A partial matrix is padded with zeros for the columns it lacks
    let first = predictor.columns()[0].clone();
    let partial = FeatureMatrix::new(vec![first, "unseen_column".to_string()], vec![1.0, 1.0])
        .unwrap();
    let reconciled = predictor.reconcile(&partial).unwrap();
    assert_eq!(reconciled.n_cols(), predictor.columns().len());
    assert_eq!(reconciled.row(0).iter().sum::<f32>(), 1.0);
    assert_eq!(predictor.predict_matrix(&reconciled).unwrap().len(), 1);
}

#[test]
fn predicting_without_a_bundle_fails() {
    let dir = tempfile::tempdir().unwrap();

    let result = Predictor::<Infer>::load(dir.path().join("model"), NdArrayDevice::Cpu);

    assert!(matches!(result, Err(Error::ArtifactNotFound(_))));
}

#[test]
fn training_without_a_vocabulary_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(dir.path());

    let result = training::run::<Train, _>(
        &layout,
        Rules,
        &training_config(),
        vec![NdArrayDevice::Cpu],
        false,
    );

    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn identical_runs_report_identical_metrics() {
    let vocabulary = Vocabulary::new([
        (Category::Players, vec!["Messi".to_string(), "Haaland".to_string()]),
        (Category::Clubs, vec!["Barcelona".to_string(), "Arsenal".to_string()]),
    ]);
    let extractor = Extractor::new(vocabulary, Rules);

    let records = extractor.extract(TRAINING_TEXTS).unwrap();
    let (encoder, matrix) = FeatureEncoder::fit_transform(&records).unwrap();
    let labels: Vec<String> = records.iter().map(|r| r.is_chunk.clone()).collect();

    let fit = || {
        let dir = tempfile::tempdir().unwrap();

        training::train::<Train>(
            vec![NdArrayDevice::Cpu],
            &encoder,
            &matrix,
            &labels,
            &training_config(),
            dir.path(),
            false,
        )
        .unwrap()
    };

    let first = fit();
    let second = fit();

    assert_eq!(first.labels, second.labels);
    assert_eq!(first.report, second.report);
}
