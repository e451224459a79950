//! `ray.io/v1alpha1` RayCluster serialization types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cluster::Cluster;
use crate::k8s::{ObjectMeta, PodTemplateSpec, Service, ServiceType};

/// API version of the RayCluster resource
pub const RAY_CLUSTER_API_VERSION: &str = "ray.io/v1alpha1";

/// Kind of the RayCluster resource
pub const RAY_CLUSTER_KIND: &str = "RayCluster";

/// RayCluster resource
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RayCluster {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: RayClusterSpec,
}

impl RayCluster {
    /// Create a RayCluster with the given metadata and spec
    pub fn new(metadata: ObjectMeta, spec: RayClusterSpec) -> Self {
        Self {
            api_version: RAY_CLUSTER_API_VERSION.to_string(),
            kind: RAY_CLUSTER_KIND.to_string(),
            metadata,
            spec,
        }
    }

    /// Cluster name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Cluster namespace
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}

/// RayCluster spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RayClusterSpec {
    /// Ray version
    pub ray_version: String,
    /// Head group
    pub head_group_spec: RayHeadGroupSpec,
    /// Worker groups
    #[serde(default)]
    pub worker_group_specs: Vec<RayWorkerGroupSpec>,
    /// Annotations for the operator-created head service
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub head_service_annotations: BTreeMap<String, String>,
}

/// Head group of a RayCluster
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RayHeadGroupSpec {
    /// Head service type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    /// User-authored head service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_service: Option<Service>,
    /// Always 1
    pub replicas: i32,
    /// `ray start` parameters
    #[serde(default)]
    pub ray_start_params: BTreeMap<String, String>,
    /// Pod template
    pub template: PodTemplateSpec,
}

/// Worker group of a RayCluster
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RayWorkerGroupSpec {
    /// Group name
    pub group_name: String,
    /// Desired replicas
    pub replicas: i32,
    /// Lower bound
    pub min_replicas: i32,
    /// Upper bound
    pub max_replicas: i32,
    /// `ray start` parameters
    #[serde(default)]
    pub ray_start_params: BTreeMap<String, String>,
    /// Pod template
    pub template: PodTemplateSpec,
}

impl From<&Cluster> for ObjectMeta {
    fn from(cluster: &Cluster) -> Self {
        ObjectMeta::new(&cluster.name, &cluster.namespace)
    }
}
