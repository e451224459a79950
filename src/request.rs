//! Request documents accepted by the CLI

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use raysynth_common::crd::{Cluster, ComputeTemplate, ComputeTemplateIndex};
use raysynth_common::yaml::from_yaml_str;
use raysynth_common::Result;

/// A cluster request together with the compute templates it may reference
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    /// The cluster to synthesize
    pub cluster: Cluster,
    /// Available compute templates
    #[serde(default)]
    pub compute_templates: Vec<ComputeTemplate>,
}

impl SynthesisRequest {
    /// Parse a YAML or JSON request document
    pub fn from_yaml(input: &str) -> Result<Self> {
        from_yaml_str(input, "SynthesisRequest")
    }

    /// Index the compute templates by name
    pub fn template_index(&self) -> ComputeTemplateIndex {
        self.compute_templates.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"
cluster:
  name: demo
  namespace: ray
  user: alice
  version: 2.9.0
  envs:
    RAY_LOG: debug
  clusterSpec:
    headGroupSpec:
      computeTemplate: head
      rayStartParams:
        dashboard-host: 0.0.0.0
    workerGroupSpec:
      - groupName: small
        computeTemplate: head
        replicas: 2
computeTemplates:
  - name: head
    namespace: ray
    cpu: 2
    memory: 8
"#;

    #[test]
    fn yaml_request_parses() {
        let request = SynthesisRequest::from_yaml(REQUEST).unwrap();
        assert_eq!(request.cluster.name, "demo");
        assert_eq!(request.cluster.version, "2.9.0");
        assert_eq!(request.cluster.envs["RAY_LOG"], "debug");
        assert_eq!(
            request.cluster.cluster_spec.head_group_spec.ray_start_params["dashboard-host"],
            "0.0.0.0"
        );
        assert!(request.template_index().get("head").is_some());
    }

    #[test]
    fn unquoted_numbers_in_string_fields() {
        let request = SynthesisRequest::from_yaml(
            r#"
cluster:
  name: demo
  namespace: ray
  version: 2.10
  envs:
    OMP_NUM_THREADS: 4
  clusterSpec:
    headGroupSpec:
      computeTemplate: head
      rayStartParams:
        num-cpus: 1
        block: true
"#,
        )
        .unwrap();
        assert_eq!(request.cluster.version, "2.10");
        assert_eq!(request.cluster.envs["OMP_NUM_THREADS"], "4");
        let params = &request.cluster.cluster_spec.head_group_spec.ray_start_params;
        assert_eq!(params["num-cpus"], "1");
        assert_eq!(params["block"], "true");
    }

    #[test]
    fn missing_cluster_is_rejected() {
        let err = SynthesisRequest::from_yaml("computeTemplates: []").unwrap_err();
        assert!(err.to_string().contains("cluster"));
    }
}
