//! Container environment tables
//!
//! Built-in variables come first, in a fixed per-role order; user variables
//! follow in key order. A user variable that reuses a built-in name replaces
//! it, so names stay unique and the user value is the one the container sees.

use std::collections::BTreeMap;

use raysynth_common::k8s::EnvVar;
use raysynth_common::labels::WORKER_CONTAINER_NAME;

use crate::pod_template::NodeRole;

/// Built-in environment for a role
pub fn builtin_env(role: &NodeRole) -> Vec<EnvVar> {
    match role {
        NodeRole::Head => vec![EnvVar::from_field("MY_POD_IP", "status.podIP")],
        NodeRole::Worker { .. } => vec![
            EnvVar::literal("RAY_DISABLE_DOCKER_CPU_WARNING", "1"),
            EnvVar::literal("TYPE", "worker"),
            EnvVar::from_resource("CPU_REQUEST", WORKER_CONTAINER_NAME, "requests.cpu"),
            EnvVar::from_resource("CPU_LIMITS", WORKER_CONTAINER_NAME, "limits.cpu"),
            EnvVar::from_resource("MEMORY_REQUESTS", WORKER_CONTAINER_NAME, "requests.memory"),
            EnvVar::from_resource("MEMORY_LIMITS", WORKER_CONTAINER_NAME, "limits.memory"),
            EnvVar::from_field("MY_POD_NAME", "metadata.name"),
            EnvVar::from_field("MY_POD_IP", "status.podIP"),
        ],
    }
}

/// Append user variables after the built-ins
pub fn merge_user_env(mut env: Vec<EnvVar>, user: &BTreeMap<String, String>) -> Vec<EnvVar> {
    env.retain(|var| !user.contains_key(&var.name));
    env.extend(user.iter().map(|(k, v)| EnvVar::literal(k, v)));
    env
}

/// Full environment for a role's primary container
pub fn container_env(role: &NodeRole, user: &BTreeMap<String, String>) -> Vec<EnvVar> {
    merge_user_env(builtin_env(role), user)
}
