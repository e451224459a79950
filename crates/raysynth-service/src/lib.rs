//! Head service synthesis for Ray clusters
//!
//! Computes the head service for a RayCluster and reconciles it with an
//! optional user-authored service. Which side wins for each field is decided
//! by one table, [`MergePrecedence`], rather than by scattered conditionals.

#![deny(missing_docs)]

pub mod compiler;
pub mod ports;
pub mod precedence;

pub use compiler::{head_service_labels, HeadServiceSynthesizer};
pub use ports::{default_service_ports, resolve_service_ports};
pub use precedence::{merge_maps, merge_ports, KeyScope, MergePrecedence, Precedence, Side};
