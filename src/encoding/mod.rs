//! One-hot encoding of token records into a numeric feature matrix

pub mod columns;
pub mod encoder;
pub mod matrix;

pub use columns::{Categorical, Numeric};
pub use encoder::FeatureEncoder;
pub use matrix::{Drift, FeatureMatrix};
