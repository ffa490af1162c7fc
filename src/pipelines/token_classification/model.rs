use burn::{
    module::Module,
    nn::{Initializer, Linear, LinearConfig},
    tensor::{
        backend::{AutodiffBackend, Backend},
        Tensor,
    },
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};

use super::{
    batcher::{Infer, Train},
    ModelConfig,
};

/// Linear support-vector classifier, one-vs-rest over every class
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// One weight column and bias per class
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,

    /// Weight of the squared L2 norm of the weights in the loss
    pub penalty: f64,
}

impl ModelConfig {
    /// Initialize a model with zero weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let output = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);

        Model {
            output,
            n_classes: self.n_classes,
            penalty: self.penalty,
        }
    }
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Width of the feature rows the model accepts
    pub fn n_features(&self) -> usize {
        self.output.weight.val().dims()[0]
    }

    /// Defines forward pass for training.
    ///
    /// The loss is the squared hinge of every one-vs-rest margin, summed over classes and
    /// averaged over the batch, plus the weighted squared norm of the weights.
    pub fn forward(&self, item: Train<B>) -> ClassificationOutput<B> {
        let output = self.output.forward(item.input.features);

        let margins = (output.clone() * item.signs)
            .neg()
            .add_scalar(1.0)
            .clamp_min(0.0);

        let hinge = (margins.clone() * margins).sum_dim(1).mean();

        let weight = self.output.weight.val();
        let norm = (weight.clone() * weight).sum();

        let loss = hinge + norm.mul_scalar(self.penalty);

        ClassificationOutput {
            loss,
            output,
            targets: item.targets,
        }
    }

    /// Defines forward pass for inference: one decision score per class
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 2> {
        self.output.forward(input.features)
    }

    /// The highest-scoring class id for each row
    pub fn predict(&self, input: Infer<B>) -> Vec<usize> {
        self.infer(input)
            .argmax(1)
            .into_data()
            .convert::<i64>()
            .value
            .into_iter()
            .map(|id| id as usize)
            .collect()
    }
}

/// Define training step
impl<B: AutodiffBackend> TrainStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        // Run forward pass, calculate gradients and return them along with the output
        let output = self.forward(item);
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

/// Define validation step
impl<B: Backend> ValidStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> ClassificationOutput<B> {
        self.forward(item)
    }
}
