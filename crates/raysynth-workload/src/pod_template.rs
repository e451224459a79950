//! Role-driven pod template builder
//!
//! Head and worker pods share image, resource, volume, and metadata logic.
//! The [`NodeRole`] supplies everything that differs: container name,
//! built-in environment, ports, and lifecycle hooks.

use std::collections::BTreeMap;

use raysynth_common::crd::VolumeSpec;
use raysynth_common::k8s::{
    Container, ContainerPort, ExecAction, Lifecycle, LifecycleHandler, PodMeta, PodSpec,
    PodTemplateSpec,
};
use raysynth_common::labels::{
    head_identifier, APPLICATION_NAME, APPLICATION_NAME_LABEL, CLIENT_PORT, CLIENT_PORT_NAME,
    COMPONENT_NAME, COMPUTE_TEMPLATE_ANNOTATION, DASHBOARD_PORT, DASHBOARD_PORT_NAME, GCS_PORT,
    GCS_PORT_NAME, HEAD_CONTAINER_NAME, IMAGE_ANNOTATION, MANAGED_BY_LABEL, METRICS_PORT,
    METRICS_PORT_NAME, RAY_CLUSTER_LABEL, RAY_GROUP_LABEL, RAY_ID_LABEL, RAY_NODE_TYPE_LABEL,
    WORKER_CONTAINER_NAME, WORKER_PORT,
};
use raysynth_common::SynthesisConfig;
use tracing::debug;

use crate::compute::ResolvedCompute;
use crate::env::container_env;
use crate::volume::build_volumes;

// =============================================================================
// Node role
// =============================================================================

/// Which kind of Ray node a pod template is for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// The single head node
    Head,
    /// A member of a named worker group
    Worker {
        /// Worker group name
        group: String,
    },
}

impl NodeRole {
    /// Worker role for a group
    pub fn worker(group: impl Into<String>) -> Self {
        Self::Worker {
            group: group.into(),
        }
    }

    /// Name of the primary container
    pub fn container_name(&self) -> &'static str {
        match self {
            Self::Head => HEAD_CONTAINER_NAME,
            Self::Worker { .. } => WORKER_CONTAINER_NAME,
        }
    }

    /// Value of the node-type label
    pub fn node_type(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Worker { .. } => "worker",
        }
    }

    /// Fixed container ports
    pub fn ports(&self) -> Vec<ContainerPort> {
        match self {
            Self::Head => vec![
                ContainerPort::named(GCS_PORT_NAME, GCS_PORT),
                ContainerPort::named(CLIENT_PORT_NAME, CLIENT_PORT),
                ContainerPort::named(DASHBOARD_PORT_NAME, DASHBOARD_PORT),
                ContainerPort::named(METRICS_PORT_NAME, METRICS_PORT),
            ],
            Self::Worker { .. } => vec![ContainerPort::anonymous(WORKER_PORT)],
        }
    }

    /// Lifecycle hooks; workers leave the cluster cleanly before stopping
    pub fn lifecycle(&self) -> Option<Lifecycle> {
        match self {
            Self::Head => None,
            Self::Worker { .. } => Some(Lifecycle {
                pre_stop: Some(LifecycleHandler {
                    exec: Some(ExecAction {
                        command: vec![
                            "/bin/sh".to_string(),
                            "-c".to_string(),
                            "ray stop".to_string(),
                        ],
                    }),
                }),
            }),
        }
    }

    /// Pod labels identifying this role within a cluster
    pub fn pod_labels(&self, cluster_name: &str) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(RAY_CLUSTER_LABEL.to_string(), cluster_name.to_string());
        labels.insert(RAY_NODE_TYPE_LABEL.to_string(), self.node_type().to_string());
        match self {
            Self::Head => {
                labels.insert(RAY_ID_LABEL.to_string(), head_identifier(cluster_name));
            }
            Self::Worker { group } => {
                labels.insert(RAY_GROUP_LABEL.to_string(), group.clone());
            }
        }
        labels.insert(
            APPLICATION_NAME_LABEL.to_string(),
            APPLICATION_NAME.to_string(),
        );
        labels.insert(MANAGED_BY_LABEL.to_string(), COMPONENT_NAME.to_string());
        labels
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the pod template for one head or worker group.
///
/// ```ignore
/// let template = PodTemplateBuilder::new(NodeRole::Head, "demo", "2.9.0", &compute, &config)
///     .with_envs(&cluster.envs)
///     .with_volumes(&head.volumes)
///     .build();
/// ```
pub struct PodTemplateBuilder<'a> {
    role: NodeRole,
    cluster_name: &'a str,
    version: &'a str,
    compute: &'a ResolvedCompute,
    config: &'a SynthesisConfig,
    image: Option<&'a str>,
    envs: Option<&'a BTreeMap<String, String>>,
    volumes: &'a [VolumeSpec],
    labels: BTreeMap<String, String>,
}

impl<'a> PodTemplateBuilder<'a> {
    /// Start a builder for a role
    pub fn new(
        role: NodeRole,
        cluster_name: &'a str,
        version: &'a str,
        compute: &'a ResolvedCompute,
        config: &'a SynthesisConfig,
    ) -> Self {
        Self {
            role,
            cluster_name,
            version,
            compute,
            config,
            image: None,
            envs: None,
            volumes: &[],
            labels: BTreeMap::new(),
        }
    }

    /// Use this image instead of the versioned default. Empty means unset.
    pub fn with_image(mut self, image: Option<&'a str>) -> Self {
        self.image = image;
        self
    }

    /// User environment variables
    pub fn with_envs(mut self, envs: &'a BTreeMap<String, String>) -> Self {
        self.envs = Some(envs);
        self
    }

    /// Volume descriptors
    pub fn with_volumes(mut self, volumes: &'a [VolumeSpec]) -> Self {
        self.volumes = volumes;
        self
    }

    /// Extra pod labels, applied over the role labels
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Resolved container image
    pub fn image(&self) -> String {
        match self.image {
            Some(image) if !image.is_empty() => image.to_string(),
            _ => self.config.default_image(self.version),
        }
    }

    /// Build the pod template
    pub fn build(self) -> PodTemplateSpec {
        let image = self.image();
        let volumes = build_volumes(self.volumes);
        let env = match self.envs {
            Some(user) => container_env(&self.role, user),
            None => container_env(&self.role, &BTreeMap::new()),
        };

        debug!(
            cluster = %self.cluster_name,
            role = self.role.node_type(),
            image = %image,
            compute_template = %self.compute.template_name,
            "building pod template"
        );

        let container = Container {
            name: self.role.container_name().to_string(),
            image: image.clone(),
            env,
            ports: self.role.ports(),
            resources: self.compute.resource_requirements(),
            volume_mounts: volumes.mounts,
            lifecycle: self.role.lifecycle(),
        };

        let mut labels = self.role.pod_labels(self.cluster_name);
        labels.extend(self.labels);

        let mut annotations = BTreeMap::new();
        annotations.insert(
            COMPUTE_TEMPLATE_ANNOTATION.to_string(),
            self.compute.template_name.clone(),
        );
        annotations.insert(IMAGE_ANNOTATION.to_string(), image);

        PodTemplateSpec {
            metadata: PodMeta {
                labels,
                annotations,
            },
            spec: PodSpec {
                containers: vec![container],
                volumes: volumes.volumes,
            },
        }
    }
}
