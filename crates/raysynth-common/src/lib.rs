//! Common types for raysynth: cluster specs, manifest types, errors, and utilities

#![deny(missing_docs)]

pub mod config;
pub mod crd;
pub mod error;
pub mod k8s;
pub mod kube_utils;
pub mod labels;
pub mod quantity;
pub mod telemetry;
pub mod yaml;

pub use config::SynthesisConfig;
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
