//! # Car Evaluator
#![forbid(unsafe_code)]

/// The fixed feature schema
pub mod schema;

/// Categorical encoders
pub mod encoders;

/// Datasets
pub mod datasets;

/// Training
pub mod training;

/// Artifact persistence
pub mod artifacts;

/// The classification pipeline
pub mod pipeline;

/// The prediction web service
pub mod server;

/// Error macros
#[macro_use]
extern crate anyhow;
