//! Volume synthesis
//!
//! Each host-path descriptor becomes a container mount plus a pod volume
//! sharing its name. Other volume types are not synthesized yet and are
//! skipped rather than rejected.

use raysynth_common::crd::{VolumeSpec, VolumeType};
use raysynth_common::k8s::{Volume, VolumeMount};
use tracing::debug;

/// Mounts and pod volumes built from a group's volume descriptors
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltVolumes {
    /// Mounts for the primary container, in descriptor order
    pub mounts: Vec<VolumeMount>,
    /// Pod volumes, in descriptor order
    pub volumes: Vec<Volume>,
}

impl BuiltVolumes {
    /// Whether nothing was built
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty() && self.volumes.is_empty()
    }
}

/// Build mounts and volumes for every supported descriptor
pub fn build_volumes(specs: &[VolumeSpec]) -> BuiltVolumes {
    let mut built = BuiltVolumes::default();

    for spec in specs {
        match spec.volume_type {
            VolumeType::HostPath => {
                built.mounts.push(VolumeMount {
                    name: spec.name.clone(),
                    mount_path: spec.mount_path.clone(),
                    read_only: Some(spec.read_only),
                    mount_propagation: spec
                        .mount_propagation_mode
                        .as_kubernetes()
                        .map(str::to_string),
                });
                built.volumes.push(Volume::from_host_path(
                    &spec.name,
                    &spec.source,
                    spec.host_path_type.as_str(),
                ));
            }
            VolumeType::PersistentVolumeClaim => {
                debug!(volume = %spec.name, "skipping persistent volume claim; not synthesized");
            }
        }
    }

    built
}
