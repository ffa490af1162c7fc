use burn::{
    data::dataloader,
    tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor},
};
use derive_new::new;

use super::Item;

/// An inference batch of encoded tokens
#[derive(Clone, Debug, new)]
pub struct Infer<B: Backend> {
    /// Feature rows as 2D tensor: [batch_size, n_features]
    pub features: Tensor<B, 2>,
}

/// A training batch of encoded tokens
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,

    /// One-vs-rest targets: +1 for the token's class, -1 for every other class
    pub signs: Tensor<B, 2>,
}

/// Struct for batching encoded token rows
#[derive(Clone, Debug, new)]
pub struct Batcher<B: Backend> {
    /// Width of every feature row
    pub n_features: usize,

    /// Total number of classes
    pub n_classes: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Vec<f32>, Infer<B>> for Batcher<B> {
    /// Stacks feature rows into an inference batch
    fn batch(&self, items: Vec<Vec<f32>>) -> Infer<B> {
        let batch_size = items.len();

        let values: Vec<B::FloatElem> = items
            .into_iter()
            .flatten()
            .map(|value| value.elem())
            .collect();

        let features = Tensor::from_data(
            Data::new(values, Shape::new([batch_size, self.n_features])),
            &self.device,
        );

        Infer { features }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend> dataloader::batcher::Batcher<Item, Train<B>> for Batcher<B> {
    /// Collects encoded items into a training batch
    fn batch(&self, items: Vec<Item>) -> Train<B> {
        let batch_size = items.len();

        let class_ids: Vec<usize> = items.iter().map(|item| item.class_id).collect();

        let input: Infer<B> = self.batch(items.into_iter().map(|item| item.features).collect());

        let targets = Tensor::from_data(
            Data::new(
                class_ids
                    .iter()
                    .map(|id| (*id as i64).elem::<B::IntElem>())
                    .collect(),
                Shape::new([batch_size]),
            ),
            &self.device,
        );

        let signs: Vec<B::FloatElem> = class_ids
            .iter()
            .flat_map(|id| {
                (0..self.n_classes).map(move |class| if class == *id { 1.0_f32 } else { -1.0 })
            })
            .map(|sign| sign.elem())
            .collect();

        let signs = Tensor::from_data(
            Data::new(signs, Shape::new([batch_size, self.n_classes])),
            &self.device,
        );

        // Create and return training batch
        Train {
            input,
            targets,
            signs,
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{ndarray::NdArrayDevice, NdArray},
        data::dataloader::batcher::Batcher as _,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    type B = NdArray;

    #[test]
    fn signs_mark_the_target_class() {
        let batcher = Batcher::<B>::new(2, 3, NdArrayDevice::Cpu);

        let batch: Train<B> = batcher.batch(vec![
            Item::new(vec![1.0, 0.0], 2),
            Item::new(vec![0.0, 1.0], 0),
        ]);

        assert_eq!(batch.input.features.dims(), [2, 2]);
        assert_eq!(
            batch.targets.into_data().convert::<i64>().value,
            vec![2, 0]
        );
        assert_eq!(
            batch.signs.into_data().convert::<f32>().value,
            vec![-1.0, -1.0, 1.0, 1.0, -1.0, -1.0]
        );
    }
}
