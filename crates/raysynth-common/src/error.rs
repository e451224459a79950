//! Error types for raysynth
//!
//! Errors are structured with fields to aid debugging. Every synthesis
//! failure is local and synchronous: the caller gets either a complete
//! manifest or one of these, never a partially built object.

use thiserror::Error;

/// Main error type for synthesis operations
#[derive(Debug, Error)]
pub enum Error {
    /// A group references a compute template that is not in the index
    #[error("compute template '{name}' not found (referenced by {group})")]
    ComputeTemplateNotFound {
        /// Name of the missing template
        name: String,
        /// Group that referenced it (e.g. "head", "worker group 'small'")
        group: String,
    },

    /// A resource quantity could not be parsed or is malformed
    #[error("invalid quantity for {field}: '{value}' ({message})")]
    InvalidQuantity {
        /// Field the quantity belongs to (e.g. "cpu", "compute template 'small'.memory")
        field: String,
        /// The offending value
        value: String,
        /// What is wrong with it
        message: String,
    },

    /// The primary container was not found in a pod template
    #[error("pod template has no container named '{container}'")]
    MissingContainer {
        /// Expected container name
        container: String,
    },

    /// Two ports resolved to the same name
    #[error("duplicate port name '{name}' in {context}")]
    DuplicatePortName {
        /// The colliding name
        name: String,
        /// Where the collision happened (container ports, override ports)
        context: String,
    },

    /// A node has neither an internal nor an external address
    #[error("host IP unknown for node '{node}'; known addresses: [{}]", addresses.join(", "))]
    NodeAddressNotFound {
        /// Node name
        node: String,
        /// Every address the node reported, formatted as `Type=Address`
        addresses: Vec<String>,
    },

    /// A node address is not a valid IP
    #[error("node '{node}' reported an unparsable address '{address}'")]
    InvalidAddress {
        /// Node name
        node: String,
        /// The raw address string
        address: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The document kind being processed (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create a compute-template-not-found error
    pub fn template_not_found(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::ComputeTemplateNotFound {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Create an invalid quantity error
    pub fn invalid_quantity(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidQuantity {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a missing container error
    pub fn missing_container(container: impl Into<String>) -> Self {
        Self::MissingContainer {
            container: container.into(),
        }
    }

    /// Create a duplicate port name error
    pub fn duplicate_port(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicatePortName {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error for a specific document kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Whether the error comes from bad configuration input rather than
    /// a malformed pod template or node record
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ComputeTemplateNotFound { .. } | Self::InvalidQuantity { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
