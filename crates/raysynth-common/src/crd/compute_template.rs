use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named bundle of compute resources that groups reference by name
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeTemplate {
    /// Template name
    pub name: String,
    /// Namespace the template is stored in
    #[serde(default)]
    pub namespace: String,
    /// CPU cores
    pub cpu: u32,
    /// Memory in GiB
    pub memory: u32,
    /// GPU count
    #[serde(default)]
    pub gpu: u32,
    /// Extended resource key for GPUs (e.g. `nvidia.com/gpu`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_accelerator: Option<String>,
}

/// Compute templates keyed by name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputeTemplateIndex(BTreeMap<String, ComputeTemplate>);

impl ComputeTemplateIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any previous one with the same name
    pub fn insert(&mut self, template: ComputeTemplate) -> Option<ComputeTemplate> {
        self.0.insert(template.name.clone(), template)
    }

    /// Look up a template by name
    pub fn get(&self, name: &str) -> Option<&ComputeTemplate> {
        self.0.get(name)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Templates in name order
    pub fn iter(&self) -> impl Iterator<Item = &ComputeTemplate> {
        self.0.values()
    }
}

impl FromIterator<ComputeTemplate> for ComputeTemplateIndex {
    fn from_iter<I: IntoIterator<Item = ComputeTemplate>>(iter: I) -> Self {
        let mut index = Self::new();
        for template in iter {
            index.insert(template);
        }
        index
    }
}
