//! raysynth - Ray cluster manifest synthesis
//!
//! Turns a high-level cluster request (a head group plus named worker groups,
//! each sized by a named compute template) into the manifests the Ray
//! operator runs: a `RayCluster` with head and worker pod templates, and the
//! Service fronting the head pod.
//!
//! Synthesis is a pure function of its inputs. Identical requests produce
//! identical output, down to the order of ports, volumes, and environment
//! variables.
//!
//! # Crates
//!
//! - [`raysynth_common`] - request and manifest types, errors, labels, logging
//! - [`raysynth_workload`] - compute resolution, volumes, pod templates
//! - [`raysynth_service`] - head service ports and override merging
//!
//! # Modules
//!
//! - [`cluster`] - RayCluster assembly
//! - [`request`] - request documents read by the CLI

#![deny(missing_docs)]

pub mod cluster;
pub mod request;

pub use cluster::ClusterSynthesizer;
pub use raysynth_common::{Error, Result, SynthesisConfig};
pub use request::SynthesisRequest;

use raysynth_common::crd::{Cluster, ComputeTemplateIndex, RayCluster};
use raysynth_common::k8s::Service;
use raysynth_service::HeadServiceSynthesizer;
use serde::Serialize;

/// Everything synthesized for one cluster request
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedCluster {
    /// The RayCluster custom resource
    pub ray_cluster: RayCluster,
    /// The head service
    pub head_service: Service,
}

/// Synthesize the RayCluster and its head service
pub fn synthesize(
    cluster: &Cluster,
    templates: &ComputeTemplateIndex,
    config: &SynthesisConfig,
) -> Result<SynthesizedCluster> {
    let ray_cluster = ClusterSynthesizer::new(cluster, templates, config).synthesize()?;
    let head_service = HeadServiceSynthesizer::new(&ray_cluster).synthesize()?;
    Ok(SynthesizedCluster {
        ray_cluster,
        head_service,
    })
}
