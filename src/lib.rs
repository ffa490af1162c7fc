//! # Football NER
//!
//! Tags football entities (players, clubs, leagues, nations) in text with engineered token
//! features and a linear support-vector classifier.
#![forbid(unsafe_code)]

/// Error types shared by every stage
pub mod error;

/// Artifact layout
pub mod config;

/// Tabular inputs and text datasets
pub mod datasets;

/// Popular-word vocabulary
pub mod vocabulary;

/// Tokenization and linguistic annotation
pub mod annotation;

/// Per-token feature records
pub mod features;

/// One-hot feature encoding
pub mod encoding;

/// Pipelines
pub mod pipelines;

/// Utilities
pub mod utils;

/// CLI helpers
pub mod cli;
