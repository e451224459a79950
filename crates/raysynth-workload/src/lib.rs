//! Pod template synthesis for Ray head and worker groups
//!
//! Turns a group request plus its resolved compute template into a complete
//! pod template: image, resources, environment, ports, lifecycle, volumes,
//! labels, and annotations. Head and worker pods share one builder; the
//! [`NodeRole`] selects the role-specific tables.

#![deny(missing_docs)]

pub mod compute;
pub mod env;
pub mod pod_template;
pub mod volume;

pub use compute::{
    compute_template_config_map, compute_template_from_config_map, resolve_compute,
    ResolvedCompute,
};
pub use pod_template::{NodeRole, PodTemplateBuilder};
pub use volume::{build_volumes, BuiltVolumes};
