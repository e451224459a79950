//! Synthesis configuration
//!
//! Process-wide defaults that apply when a cluster request leaves a value
//! unset. Passed explicitly to every synthesizer; nothing reads it from
//! global state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::labels::{DEFAULT_GPU_ACCELERATOR, DEFAULT_IMAGE_REPOSITORY};

/// Defaults applied during synthesis
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisConfig {
    /// Repository used to build `<repository>:<version>` when a group has no image
    pub default_image_repository: String,
    /// Extended resource key for GPUs when a compute template does not set one
    pub default_gpu_accelerator: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_image_repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            default_gpu_accelerator: DEFAULT_GPU_ACCELERATOR.to_string(),
        }
    }
}

impl SynthesisConfig {
    /// Override the default image repository
    pub fn with_image_repository(mut self, repository: impl Into<String>) -> Self {
        self.default_image_repository = repository.into();
        self
    }

    /// Override the default GPU accelerator key
    pub fn with_gpu_accelerator(mut self, accelerator: impl Into<String>) -> Self {
        self.default_gpu_accelerator = accelerator.into();
        self
    }

    /// Image for a given Ray version when the group does not name one
    pub fn default_image(&self, version: &str) -> String {
        format!("{}:{}", self.default_image_repository, version)
    }
}
