//! Cluster request types and the RayCluster custom resource
//!
//! Input records (`Cluster`, `ComputeTemplate`, `VolumeSpec`) describe what a
//! user asked for; `RayCluster` is what synthesis hands to the Ray operator.

mod cluster;
mod compute_template;
mod ray_cluster;
mod scalar;
mod volume;

pub use cluster::{Cluster, ClusterSpec, Environment, HeadGroupSpec, WorkerGroupSpec};
pub use compute_template::{ComputeTemplate, ComputeTemplateIndex};
pub use ray_cluster::{
    RayCluster, RayClusterSpec, RayHeadGroupSpec, RayWorkerGroupSpec, RAY_CLUSTER_API_VERSION,
    RAY_CLUSTER_KIND,
};
pub use volume::{HostPathType, MountPropagationMode, VolumeSpec, VolumeType};
