//! Cluster synthesizer
//!
//! Assembles a RayCluster from a cluster request: resolves each group's
//! compute template, builds its pod template, and stamps cluster metadata.
//! The first failing group aborts synthesis; no partial RayCluster is
//! returned.

use std::collections::BTreeMap;

use raysynth_common::crd::{
    Cluster, ComputeTemplateIndex, RayCluster, RayClusterSpec, RayHeadGroupSpec,
    RayWorkerGroupSpec, WorkerGroupSpec,
};
use raysynth_common::k8s::ObjectMeta;
use raysynth_common::labels::{
    APPLICATION_NAME, APPLICATION_NAME_LABEL, COMPONENT_NAME, MANAGED_BY_LABEL,
    RAY_CLUSTER_ENVIRONMENT_LABEL, RAY_CLUSTER_NAME_LABEL, RAY_CLUSTER_USER_LABEL,
    RAY_CLUSTER_VERSION_LABEL,
};
use raysynth_common::{Result, SynthesisConfig};
use raysynth_workload::{resolve_compute, NodeRole, PodTemplateBuilder};
use tracing::{debug, info};

/// Labels stamped on the RayCluster object
pub fn cluster_labels(cluster: &Cluster) -> BTreeMap<String, String> {
    BTreeMap::from([
        (RAY_CLUSTER_NAME_LABEL.to_string(), cluster.name.clone()),
        (RAY_CLUSTER_USER_LABEL.to_string(), cluster.user.clone()),
        (RAY_CLUSTER_VERSION_LABEL.to_string(), cluster.version.clone()),
        (
            RAY_CLUSTER_ENVIRONMENT_LABEL.to_string(),
            cluster.environment.to_string(),
        ),
        (
            APPLICATION_NAME_LABEL.to_string(),
            APPLICATION_NAME.to_string(),
        ),
        (MANAGED_BY_LABEL.to_string(), COMPONENT_NAME.to_string()),
    ])
}

/// Synthesizes a RayCluster from a cluster request
pub struct ClusterSynthesizer<'a> {
    cluster: &'a Cluster,
    templates: &'a ComputeTemplateIndex,
    config: &'a SynthesisConfig,
}

impl<'a> ClusterSynthesizer<'a> {
    /// Create a synthesizer
    pub fn new(
        cluster: &'a Cluster,
        templates: &'a ComputeTemplateIndex,
        config: &'a SynthesisConfig,
    ) -> Self {
        Self {
            cluster,
            templates,
            config,
        }
    }

    /// Build the RayCluster
    pub fn synthesize(&self) -> Result<RayCluster> {
        let cluster = self.cluster;
        let spec = &cluster.cluster_spec;
        info!(
            cluster = %cluster.name,
            namespace = %cluster.namespace,
            worker_groups = spec.worker_group_spec.len(),
            "synthesizing ray cluster"
        );

        let head_group_spec = self.head_group()?;
        let worker_group_specs = spec
            .worker_group_spec
            .iter()
            .map(|group| self.worker_group(group))
            .collect::<Result<Vec<_>>>()?;

        let metadata = ObjectMeta::from(cluster).with_labels(cluster_labels(cluster));
        let ray_cluster = RayCluster::new(
            metadata,
            RayClusterSpec {
                ray_version: cluster.version.clone(),
                head_group_spec,
                worker_group_specs,
                head_service_annotations: spec.head_service_annotations.clone(),
            },
        );

        info!(cluster = %cluster.name, "ray cluster synthesized");
        Ok(ray_cluster)
    }

    fn head_group(&self) -> Result<RayHeadGroupSpec> {
        let head = &self.cluster.cluster_spec.head_group_spec;
        let compute = resolve_compute(&head.compute_template, "head", self.templates, self.config)?;
        debug!(
            cluster = %self.cluster.name,
            compute_template = %compute.template_name,
            "building head group"
        );

        let template = PodTemplateBuilder::new(
            NodeRole::Head,
            &self.cluster.name,
            &self.cluster.version,
            &compute,
            self.config,
        )
        .with_image(head.image.as_deref())
        .with_envs(&self.cluster.envs)
        .with_volumes(&head.volumes)
        .build();

        Ok(RayHeadGroupSpec {
            service_type: head.service_type,
            head_service: head.head_service.clone(),
            replicas: 1,
            ray_start_params: head.ray_start_params.clone(),
            template,
        })
    }

    fn worker_group(&self, group: &WorkerGroupSpec) -> Result<RayWorkerGroupSpec> {
        let context = format!("worker group '{}'", group.group_name);
        let compute =
            resolve_compute(&group.compute_template, &context, self.templates, self.config)?;
        let min_replicas = group.effective_min_replicas();
        let max_replicas = group.effective_max_replicas();
        debug!(
            cluster = %self.cluster.name,
            group = %group.group_name,
            compute_template = %compute.template_name,
            replicas = group.replicas,
            min_replicas,
            max_replicas,
            "building worker group"
        );

        let template = PodTemplateBuilder::new(
            NodeRole::worker(&group.group_name),
            &self.cluster.name,
            &self.cluster.version,
            &compute,
            self.config,
        )
        .with_image(group.image.as_deref())
        .with_envs(&self.cluster.envs)
        .with_volumes(&group.volumes)
        .build();

        Ok(RayWorkerGroupSpec {
            group_name: group.group_name.clone(),
            replicas: group.replicas,
            min_replicas,
            max_replicas,
            ray_start_params: group.ray_start_params.clone(),
            template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raysynth_common::crd::{ClusterSpec, ComputeTemplate, Environment, HeadGroupSpec};
    use raysynth_common::Error;

    fn templates() -> ComputeTemplateIndex {
        [
            ComputeTemplate {
                name: "head".to_string(),
                namespace: "ray".to_string(),
                cpu: 2,
                memory: 8,
                ..Default::default()
            },
            ComputeTemplate {
                name: "gpu".to_string(),
                namespace: "ray".to_string(),
                cpu: 8,
                memory: 32,
                gpu: 1,
                gpu_accelerator: None,
            },
        ]
        .into_iter()
        .collect()
    }

    fn cluster() -> Cluster {
        Cluster {
            name: "demo".to_string(),
            namespace: "ray".to_string(),
            user: "alice".to_string(),
            version: "2.9.0".to_string(),
            environment: Environment::Staging,
            envs: BTreeMap::new(),
            cluster_spec: ClusterSpec {
                head_group_spec: HeadGroupSpec {
                    compute_template: "head".to_string(),
                    ..Default::default()
                },
                worker_group_spec: vec![
                    WorkerGroupSpec {
                        group_name: "gpu-workers".to_string(),
                        compute_template: "gpu".to_string(),
                        replicas: 2,
                        max_replicas: Some(5),
                        ..Default::default()
                    },
                    WorkerGroupSpec {
                        group_name: "cpu-workers".to_string(),
                        compute_template: "head".to_string(),
                        replicas: 0,
                        ..Default::default()
                    },
                ],
                head_service_annotations: BTreeMap::new(),
            },
        }
    }

    // =========================================================================
    // Story: Cluster Metadata
    // =========================================================================

    #[test]
    fn cluster_labels_and_identity() {
        let (c, t, cfg) = (cluster(), templates(), SynthesisConfig::default());
        let rc = ClusterSynthesizer::new(&c, &t, &cfg).synthesize().unwrap();

        assert_eq!(rc.api_version, "ray.io/v1alpha1");
        assert_eq!(rc.kind, "RayCluster");
        assert_eq!(rc.metadata.name, "demo");
        assert_eq!(rc.metadata.namespace, "ray");
        assert_eq!(rc.metadata.labels["ray.io/cluster-name"], "demo");
        assert_eq!(rc.metadata.labels["ray.io/user"], "alice");
        assert_eq!(rc.metadata.labels["ray.io/version"], "2.9.0");
        assert_eq!(rc.metadata.labels["ray.io/environment"], "STAGING");
        assert_eq!(rc.metadata.labels.len(), 6);
        assert!(rc.metadata.annotations.is_empty());
        assert_eq!(rc.spec.ray_version, "2.9.0");
    }

    // =========================================================================
    // Story: Groups
    // =========================================================================

    #[test]
    fn head_group_has_one_replica() {
        let (c, t, cfg) = (cluster(), templates(), SynthesisConfig::default());
        let rc = ClusterSynthesizer::new(&c, &t, &cfg).synthesize().unwrap();
        assert_eq!(rc.spec.head_group_spec.replicas, 1);
        assert!(rc.spec.head_group_spec.template.container("ray-head").is_some());
    }

    #[test]
    fn worker_groups_keep_input_order_and_bounds() {
        let (c, t, cfg) = (cluster(), templates(), SynthesisConfig::default());
        let rc = ClusterSynthesizer::new(&c, &t, &cfg).synthesize().unwrap();
        let groups = &rc.spec.worker_group_specs;

        assert_eq!(groups[0].group_name, "gpu-workers");
        assert_eq!(
            (groups[0].replicas, groups[0].min_replicas, groups[0].max_replicas),
            (2, 2, 5)
        );
        assert_eq!(groups[1].group_name, "cpu-workers");
        assert_eq!(
            (groups[1].replicas, groups[1].min_replicas, groups[1].max_replicas),
            (0, 0, 0)
        );
        assert_eq!(groups[0].template.metadata.labels["ray.io/group"], "gpu-workers");
    }

    #[test]
    fn missing_worker_template_aborts() {
        let mut c = cluster();
        c.cluster_spec.worker_group_spec[1].compute_template = "absent".to_string();
        let (t, cfg) = (templates(), SynthesisConfig::default());
        match ClusterSynthesizer::new(&c, &t, &cfg).synthesize().unwrap_err() {
            Error::ComputeTemplateNotFound { name, group } => {
                assert_eq!(name, "absent");
                assert_eq!(group, "worker group 'cpu-workers'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_head_template_aborts() {
        let mut c = cluster();
        c.cluster_spec.head_group_spec.compute_template = "absent".to_string();
        let (t, cfg) = (templates(), SynthesisConfig::default());
        assert!(ClusterSynthesizer::new(&c, &t, &cfg).synthesize().is_err());
    }
}
