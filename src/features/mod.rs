/// Token records and the per-token feature functions
pub mod record;

/// Annotation-driven extraction of token records
pub mod extractor;

/// CSV artifacts of extracted records and predictions
pub mod io;

pub use extractor::Extractor;
pub use record::{Popularity, TokenRecord};
