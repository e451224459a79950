//! Helpers for reading Kubernetes API objects

use std::net::IpAddr;

use k8s_openapi::api::core::v1::{Node, NodeAddress};

use crate::Error;

const INTERNAL_IP: &str = "InternalIP";
const EXTERNAL_IP: &str = "ExternalIP";

/// Host IP of a node.
///
/// The first `InternalIP` address wins, then the first `ExternalIP`. Any other
/// address type (hostnames, DNS names) is never used.
pub fn node_host_ip(node: &Node) -> Result<IpAddr, Error> {
    let node_name = node.metadata.name.clone().unwrap_or_default();
    let addresses: &[NodeAddress] = node
        .status
        .as_ref()
        .and_then(|s| s.addresses.as_deref())
        .unwrap_or_default();

    let chosen = [INTERNAL_IP, EXTERNAL_IP]
        .iter()
        .find_map(|wanted| addresses.iter().find(|a| a.type_ == *wanted));

    let Some(address) = chosen else {
        return Err(Error::NodeAddressNotFound {
            node: node_name,
            addresses: addresses
                .iter()
                .map(|a| format!("{}={}", a.type_, a.address))
                .collect(),
        });
    };

    address
        .address
        .parse::<IpAddr>()
        .map_err(|_| Error::InvalidAddress {
            node: node_name,
            address: address.address.clone(),
        })
}
