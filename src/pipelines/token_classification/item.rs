use derive_new::new;

use crate::encoding::FeatureMatrix;

/// One encoded token with its class id
#[derive(Clone, Debug, PartialEq, new)]
pub struct Item {
    /// A row of the feature matrix
    pub features: Vec<f32>,

    /// The class id of the token's label
    pub class_id: usize,
}

/// Pair the selected matrix rows with their class ids
pub fn items(matrix: &FeatureMatrix, class_ids: &[usize], rows: &[usize]) -> Vec<Item> {
    rows.iter()
        .map(|&row| Item::new(matrix.row(row).to_vec(), class_ids[row]))
        .collect()
}
