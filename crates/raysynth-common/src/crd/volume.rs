use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Abstract volume descriptor attached to a head or worker group
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    /// Volume name, shared by the mount and the pod volume
    pub name: String,
    /// Source path on the host (or claim name for PVCs)
    #[serde(default)]
    pub source: String,
    /// Path inside the container
    pub mount_path: String,
    /// Mount read-only
    #[serde(default)]
    pub read_only: bool,
    /// Mount propagation
    #[serde(default)]
    pub mount_propagation_mode: MountPropagationMode,
    /// Backing volume type
    #[serde(default)]
    pub volume_type: VolumeType,
    /// Host path type, only meaningful for host-path volumes
    #[serde(default)]
    pub host_path_type: HostPathType,
}

/// Mount propagation mode
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum MountPropagationMode {
    /// No propagation; the field is omitted from the mount
    #[default]
    None,
    /// Host mounts are visible in the container
    HostToContainer,
    /// Mounts propagate both ways
    Bidirectional,
}

impl MountPropagationMode {
    /// Kubernetes `mountPropagation` value, if any
    pub fn as_kubernetes(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::HostToContainer => Some("HostToContainer"),
            Self::Bidirectional => Some("Bidirectional"),
        }
    }
}

/// Backing volume type
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum VolumeType {
    /// Directory or file on the node
    #[default]
    HostPath,
    /// Persistent volume claim (not synthesized yet)
    PersistentVolumeClaim,
}

/// Host path type
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum HostPathType {
    /// A directory
    #[default]
    Directory,
    /// A single file
    File,
}

impl HostPathType {
    /// Kubernetes `hostPath.type` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "Directory",
            Self::File => "File",
        }
    }
}
