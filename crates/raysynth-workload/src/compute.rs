//! Compute template resolution and persistence
//!
//! A group names a compute template; resolution looks it up and turns its
//! integer fields into the quantity strings a container's resources carry.

use std::collections::BTreeMap;

use raysynth_common::crd::{ComputeTemplate, ComputeTemplateIndex};
use raysynth_common::k8s::{ConfigMap, ResourceQuantity, ResourceRequirements};
use raysynth_common::labels::{
    COMPUTE_TEMPLATE_LABEL, CONFIG_TYPE_COMPUTE_TEMPLATE, CONFIG_TYPE_LABEL,
};
use raysynth_common::quantity::parse_count;
use raysynth_common::{Error, Result, SynthesisConfig};

/// A compute template resolved into container quantities
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCompute {
    /// Name of the template this was resolved from
    pub template_name: String,
    /// CPU quantity (whole cores)
    pub cpu: String,
    /// Memory quantity (`<N>Gi`)
    pub memory: String,
    /// GPU count; zero means no accelerator resource
    pub gpu: u32,
    /// Extended resource key for the GPUs
    pub gpu_accelerator: String,
}

impl ResolvedCompute {
    /// Container resources. Requests always equal limits, and the
    /// accelerator key only appears when at least one GPU is requested.
    pub fn resource_requirements(&self) -> ResourceRequirements {
        let mut quantity = ResourceQuantity {
            cpu: Some(self.cpu.clone()),
            memory: Some(self.memory.clone()),
            extended: BTreeMap::new(),
        };
        if self.gpu > 0 {
            quantity
                .extended
                .insert(self.gpu_accelerator.clone(), self.gpu.to_string());
        }

        ResourceRequirements {
            requests: Some(quantity.clone()),
            limits: Some(quantity),
        }
    }
}

/// Look up `name` in the index and resolve it.
///
/// `group` describes the referencing group for error messages.
pub fn resolve_compute(
    name: &str,
    group: &str,
    index: &ComputeTemplateIndex,
    config: &SynthesisConfig,
) -> Result<ResolvedCompute> {
    let template = index
        .get(name)
        .ok_or_else(|| Error::template_not_found(name, group))?;

    let cpu = template.cpu.to_string();
    let memory = format!("{}Gi", template.memory);

    let gpu_accelerator = template
        .gpu_accelerator
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(&config.default_gpu_accelerator)
        .to_string();

    Ok(ResolvedCompute {
        template_name: template.name.clone(),
        cpu,
        memory,
        gpu: template.gpu,
        gpu_accelerator,
    })
}

// =============================================================================
// ConfigMap record
// =============================================================================

const DATA_NAME: &str = "name";
const DATA_NAMESPACE: &str = "namespace";
const DATA_CPU: &str = "cpu";
const DATA_MEMORY: &str = "memory";
const DATA_GPU: &str = "gpu";
const DATA_GPU_ACCELERATOR: &str = "gpu_accelerator";

/// Persist a compute template as a labelled ConfigMap
pub fn compute_template_config_map(template: &ComputeTemplate) -> ConfigMap {
    let mut cm = ConfigMap::new(&template.name, &template.namespace)
        .with_data(DATA_NAME, &template.name)
        .with_data(DATA_NAMESPACE, &template.namespace)
        .with_data(DATA_CPU, template.cpu.to_string())
        .with_data(DATA_MEMORY, template.memory.to_string())
        .with_data(DATA_GPU, template.gpu.to_string())
        .with_data(
            DATA_GPU_ACCELERATOR,
            template.gpu_accelerator.clone().unwrap_or_default(),
        );
    cm.metadata = cm
        .metadata
        .with_label(CONFIG_TYPE_LABEL, CONFIG_TYPE_COMPUTE_TEMPLATE)
        .with_label(COMPUTE_TEMPLATE_LABEL, &template.name);
    cm
}

/// Read a compute template back from its ConfigMap record
pub fn compute_template_from_config_map(cm: &ConfigMap) -> Result<ComputeTemplate> {
    let count = |key: &str| -> Result<u32> {
        let field = format!("configmap '{}'.{}", cm.metadata.name, key);
        match cm.data.get(key) {
            Some(raw) => parse_count(raw, &field),
            None => Err(Error::invalid_quantity(field, "", "missing")),
        }
    };

    Ok(ComputeTemplate {
        name: cm
            .data
            .get(DATA_NAME)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| cm.metadata.name.clone()),
        namespace: cm
            .data
            .get(DATA_NAMESPACE)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| cm.metadata.namespace.clone()),
        cpu: count(DATA_CPU)?,
        memory: count(DATA_MEMORY)?,
        gpu: count(DATA_GPU)?,
        gpu_accelerator: cm
            .data
            .get(DATA_GPU_ACCELERATOR)
            .filter(|a| !a.is_empty())
            .cloned(),
    })
}
