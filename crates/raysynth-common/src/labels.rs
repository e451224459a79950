//! Label keys, annotation keys, and fixed naming conventions
//!
//! These values are part of the contract with the Ray operator and the
//! tooling that inspects synthesized objects, so they must not drift.

// =============================================================================
// Cluster object labels
// =============================================================================

/// Label carrying the cluster name on the RayCluster object
pub const RAY_CLUSTER_NAME_LABEL: &str = "ray.io/cluster-name";

/// Label carrying the requesting user
pub const RAY_CLUSTER_USER_LABEL: &str = "ray.io/user";

/// Label carrying the Ray version
pub const RAY_CLUSTER_VERSION_LABEL: &str = "ray.io/version";

/// Label carrying the deployment environment
pub const RAY_CLUSTER_ENVIRONMENT_LABEL: &str = "ray.io/environment";

/// Standard Kubernetes application name label
pub const APPLICATION_NAME_LABEL: &str = "app.kubernetes.io/name";

/// Standard Kubernetes managed-by label
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value of [`APPLICATION_NAME_LABEL`]
pub const APPLICATION_NAME: &str = "kuberay";

/// Value of [`MANAGED_BY_LABEL`]
pub const COMPONENT_NAME: &str = "kuberay-apiserver";

// =============================================================================
// Pod and service selector labels
// =============================================================================

/// Label selecting all pods of one cluster
pub const RAY_CLUSTER_LABEL: &str = "ray.io/cluster";

/// Label distinguishing head from worker pods
pub const RAY_NODE_TYPE_LABEL: &str = "ray.io/node-type";

/// Label carrying the derived pod identifier (`<cluster>-head`)
pub const RAY_ID_LABEL: &str = "ray.io/identifier";

/// Label carrying a worker pod's group name
pub const RAY_GROUP_LABEL: &str = "ray.io/group";

// =============================================================================
// Annotations
// =============================================================================

/// Annotation recording which compute template a group was built from
pub const COMPUTE_TEMPLATE_ANNOTATION: &str = "ray.io/compute-template";

/// Annotation recording the resolved container image of a group
pub const IMAGE_ANNOTATION: &str = "ray.io/compute-image";

/// Label marking a ConfigMap as a persisted compute template
pub const CONFIG_TYPE_LABEL: &str = "ray.io/config-type";

/// Value of [`CONFIG_TYPE_LABEL`] for compute templates
pub const CONFIG_TYPE_COMPUTE_TEMPLATE: &str = "compute-template";

/// Label carrying the compute template name on its ConfigMap record
pub const COMPUTE_TEMPLATE_LABEL: &str = "ray.io/compute-template";

// =============================================================================
// Images and resources
// =============================================================================

/// Image repository used when a group does not set an image
pub const DEFAULT_IMAGE_REPOSITORY: &str = "rayproject/ray";

/// Extended resource key used for GPUs when a template does not set one
pub const DEFAULT_GPU_ACCELERATOR: &str = "nvidia.com/gpu";

// =============================================================================
// Containers and ports
// =============================================================================

/// Name of the head group's primary container
pub const HEAD_CONTAINER_NAME: &str = "ray-head";

/// Name of a worker group's primary container
pub const WORKER_CONTAINER_NAME: &str = "ray-worker";

/// GCS (control plane / metadata) port name on the head
pub const GCS_PORT_NAME: &str = "gcs-server";

/// GCS port number
pub const GCS_PORT: u16 = 6379;

/// Ray client port name on the head
pub const CLIENT_PORT_NAME: &str = "client";

/// Ray client port number
pub const CLIENT_PORT: u16 = 10001;

/// Dashboard port name on the head
pub const DASHBOARD_PORT_NAME: &str = "dashboard";

/// Dashboard port number
pub const DASHBOARD_PORT: u16 = 8265;

/// Metrics port name, also injected into the head service when missing
pub const METRICS_PORT_NAME: &str = "metrics";

/// Default metrics port number
pub const METRICS_PORT: u16 = 8080;

/// The single anonymous port exposed by workers
pub const WORKER_PORT: u16 = 80;

/// App protocol stamped on head service ports
pub const DEFAULT_SERVICE_APP_PROTOCOL: &str = "tcp";

/// Suffix of the default head service name (`<cluster>-head-svc`)
pub const HEAD_SERVICE_SUFFIX: &str = "head-svc";

/// Name of the head service for a cluster when no override names it
pub fn head_service_name(cluster_name: &str) -> String {
    format!("{}-{}", cluster_name, HEAD_SERVICE_SUFFIX)
}

/// Pod identifier for the head of a cluster
pub fn head_identifier(cluster_name: &str) -> String {
    format!("{}-head", cluster_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        assert_eq!(head_service_name("demo"), "demo-head-svc");
        assert_eq!(head_identifier("demo"), "demo-head");
    }
}
