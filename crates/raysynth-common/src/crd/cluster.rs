use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{scalar, VolumeSpec};
use crate::k8s::{Service, ServiceType};

/// A cluster request: who wants what, and the shape of the cluster
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Target namespace
    pub namespace: String,
    /// Requesting user
    #[serde(default)]
    pub user: String,
    /// Ray version, also the default image tag
    #[serde(deserialize_with = "scalar::string")]
    pub version: String,
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
    /// Extra environment variables for every group's primary container
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub envs: BTreeMap<String, String>,
    /// Head and worker groups
    pub cluster_spec: ClusterSpec,
}

/// Deployment environment of a cluster
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    /// Development
    #[default]
    Dev,
    /// Testing
    Testing,
    /// Staging
    Staging,
    /// Production
    Production,
}

impl Environment {
    /// Label value for this environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "DEV",
            Self::Testing => "TESTING",
            Self::Staging => "STAGING",
            Self::Production => "PRODUCTION",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Head and worker groups of a cluster
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// The head group
    pub head_group_spec: HeadGroupSpec,
    /// Worker groups, synthesized in this order
    #[serde(default)]
    pub worker_group_spec: Vec<WorkerGroupSpec>,
    /// Annotations stamped on the head service; these win over annotations
    /// in a user-authored head service
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub head_service_annotations: BTreeMap<String, String>,
}

/// Head group request
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadGroupSpec {
    /// Name of the compute template to size the head with
    pub compute_template: String,
    /// Container image; `<repository>:<version>` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Head service type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    /// `ray start` parameters
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub ray_start_params: BTreeMap<String, String>,
    /// Volumes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeSpec>,
    /// Hand-authored head service merged over the computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_service: Option<Service>,
}

/// Worker group request
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerGroupSpec {
    /// Group name
    pub group_name: String,
    /// Name of the compute template to size workers with
    pub compute_template: String,
    /// Container image; `<repository>:<version>` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Desired replicas
    #[serde(default)]
    pub replicas: i32,
    /// Lower autoscaling bound; defaults to `replicas`.
    ///
    /// `Some(0)` is read as unset, the same as an omitted field, so a group
    /// cannot request a lower bound of zero through this field. Records that
    /// round-trip through zero-valued storage look identical either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,
    /// Upper autoscaling bound; defaults to `replicas`. `Some(0)` is read as
    /// unset, like [`Self::min_replicas`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i32>,
    /// `ray start` parameters
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub ray_start_params: BTreeMap<String, String>,
    /// Volumes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeSpec>,
}

impl WorkerGroupSpec {
    /// Effective lower bound. Unset and zero both fall back to `replicas`.
    pub fn effective_min_replicas(&self) -> i32 {
        self.min_replicas.filter(|n| *n != 0).unwrap_or(self.replicas)
    }

    /// Effective upper bound. Unset and zero both fall back to `replicas`.
    pub fn effective_max_replicas(&self) -> i32 {
        self.max_replicas.filter(|n| *n != 0).unwrap_or(self.replicas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_label_values() {
        assert_eq!(Environment::Production.to_string(), "PRODUCTION");
        let env: Environment = serde_json::from_str(r#""STAGING""#).unwrap();
        assert_eq!(env, Environment::Staging);
    }

    #[test]
    fn replica_bounds_default_to_replicas() {
        let mut group = WorkerGroupSpec {
            group_name: "small".to_string(),
            compute_template: "small".to_string(),
            replicas: 3,
            ..Default::default()
        };
        assert_eq!(group.effective_min_replicas(), 3);
        assert_eq!(group.effective_max_replicas(), 3);

        group.min_replicas = Some(0);
        group.max_replicas = Some(10);
        assert_eq!(group.effective_min_replicas(), 3);
        assert_eq!(group.effective_max_replicas(), 10);

        group.min_replicas = Some(1);
        assert_eq!(group.effective_min_replicas(), 1);
    }

    #[test]
    fn numeric_scalars_fill_string_fields() {
        let cluster: Cluster = serde_json::from_value(serde_json::json!({
            "name": "demo",
            "namespace": "ray",
            "version": 2.9,
            "envs": {"OMP_NUM_THREADS": 4},
            "clusterSpec": {
                "headGroupSpec": {
                    "computeTemplate": "head",
                    "rayStartParams": {"num-cpus": 1, "block": true}
                },
                "workerGroupSpec": [
                    {"groupName": "small", "computeTemplate": "small", "rayStartParams": {"num-gpus": 0}}
                ]
            }
        }))
        .unwrap();
        assert_eq!(cluster.version, "2.9");
        assert_eq!(cluster.envs["OMP_NUM_THREADS"], "4");
        let head = &cluster.cluster_spec.head_group_spec;
        assert_eq!(head.ray_start_params["num-cpus"], "1");
        assert_eq!(head.ray_start_params["block"], "true");
        assert_eq!(cluster.cluster_spec.worker_group_spec[0].ray_start_params["num-gpus"], "0");
    }

    #[test]
    fn request_document_parses() {
        let cluster: Cluster = serde_json::from_value(serde_json::json!({
            "name": "demo",
            "namespace": "ray",
            "user": "alice",
            "version": "2.9.0",
            "environment": "PRODUCTION",
            "clusterSpec": {
                "headGroupSpec": {
                    "computeTemplate": "head",
                    "serviceType": "NodePort",
                    "rayStartParams": {"dashboard-host": "0.0.0.0"}
                },
                "workerGroupSpec": [
                    {"groupName": "small", "computeTemplate": "small", "replicas": 2}
                ]
            }
        }))
        .unwrap();
        assert_eq!(
            cluster.cluster_spec.head_group_spec.service_type,
            Some(ServiceType::NodePort)
        );
        assert_eq!(cluster.cluster_spec.worker_group_spec[0].replicas, 2);
        assert!(cluster.envs.is_empty());
    }
}
