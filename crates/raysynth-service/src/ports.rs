//! Service port resolution from the head pod template

use std::collections::BTreeMap;

use raysynth_common::k8s::{PodTemplateSpec, ServicePort};
use raysynth_common::labels::{
    DEFAULT_SERVICE_APP_PROTOCOL, HEAD_CONTAINER_NAME, METRICS_PORT, METRICS_PORT_NAME,
};
use raysynth_common::{Error, Result};

/// Named ports exposed by the head container.
///
/// Unnamed container ports are called `<port>-port`. A `metrics` entry is
/// added when the container does not declare one; a declared `metrics` port
/// keeps its own number.
pub fn resolve_service_ports(template: &PodTemplateSpec) -> Result<BTreeMap<String, u16>> {
    let container = template
        .container(HEAD_CONTAINER_NAME)
        .ok_or_else(|| Error::missing_container(HEAD_CONTAINER_NAME))?;

    let mut ports = BTreeMap::new();
    for port in &container.ports {
        let name = match port.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}-port", port.container_port),
        };
        if ports.insert(name.clone(), port.container_port).is_some() {
            return Err(Error::duplicate_port(
                name,
                format!("container '{}' ports", HEAD_CONTAINER_NAME),
            ));
        }
    }

    ports
        .entry(METRICS_PORT_NAME.to_string())
        .or_insert(METRICS_PORT);

    Ok(ports)
}

/// Service ports for a resolved port map, in name order
pub fn default_service_ports(ports: &BTreeMap<String, u16>) -> Vec<ServicePort> {
    ports
        .iter()
        .map(|(name, port)| ServicePort {
            app_protocol: Some(DEFAULT_SERVICE_APP_PROTOCOL.to_string()),
            ..ServicePort::named(name, *port)
        })
        .collect()
}
