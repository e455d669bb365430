//! Error types for the access gate

use crate::model::ResourceType;
use thiserror::Error;

/// Gate error type
#[derive(Error, Debug)]
pub enum GateError {
    /// Plan service unreachable or malformed; callers see a fail-closed entitlement instead
    #[error("entitlement unavailable for {resource}: {reason}")]
    EntitlementUnavailable {
        /// Resource the entitlement was requested for
        resource: ResourceType,
        /// Upstream cause
        reason: String,
    },

    /// Record fetch failed; never rendered as an empty set
    #[error("could not load {resource}: {reason}")]
    RecordSetUnavailable {
        /// Resource being loaded
        resource: ResourceType,
        /// Upstream cause
        reason: String,
    },

    /// Record id not present in the current set
    #[error("{resource} record not found: {id}")]
    RecordNotFound {
        /// Resource being looked up
        resource: ResourceType,
        /// Requested id
        id: String,
    },

    /// Entitlement payload outside the contract
    #[error("invalid entitlement: {0}")]
    InvalidEntitlement(String),

    /// Export encoding error
    #[error("export error: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    /// Message shown in place of a view that could not load
    pub fn load_failure_message(&self) -> String {
        match self {
            GateError::RecordSetUnavailable { resource, .. } => {
                format!("Unable to load {}. Please try again.", resource)
            }
            GateError::RecordNotFound { resource, .. } => {
                format!("This {} no longer exists.", resource.singular())
            }
            other => other.to_string(),
        }
    }
}

/// Result type for the access gate
pub type GateResult<T> = Result<T, GateError>;
