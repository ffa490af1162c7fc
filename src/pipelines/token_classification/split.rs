use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Row indices of a reproducible train / held-out partition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    /// Rows used to fit the classifier
    pub train: Vec<usize>,

    /// Rows held out for evaluation
    pub test: Vec<usize>,
}

/// Shuffle `n_rows` row indices with a seeded generator and hold out `ceil(test_size * n_rows)`
/// of them, keeping at least one row for training.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n_rows).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64) * test_size.clamp(0.0, 1.0)).ceil() as usize;
    let n_test = n_test.min(n_rows.saturating_sub(1));

    let train = indices.split_off(n_test);

    log::debug!(
        "Split {} rows: train={}, test={}",
        n_rows,
        train.len(),
        indices.len()
    );

    Split {
        train,
        test: indices,
    }
}
