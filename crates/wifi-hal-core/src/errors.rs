//! Error types for the wifi-hal registry
//!
//! `HalError` is surfaced to the immediate caller of registration and removal
//! operations (the supplicant core or the RPC layer). `DeliveryError` describes a
//! single failed listener invocation; it never leaves the dispatcher.

use crate::types::{EndpointId, EntityKind, ObjectKey};

// ----------------------------------------------------------------------------
// Delivery Errors
// ----------------------------------------------------------------------------

/// Failure to deliver one call to one remote listener
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The remote endpoint is gone; its handle should be dropped
    #[error("Remote endpoint is dead")]
    DeadObject,

    /// The call could not be delivered this time
    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

impl DeliveryError {
    pub fn transport<T: Into<String>>(reason: T) -> Self {
        DeliveryError::Transport {
            reason: reason.into(),
        }
    }

    /// Whether the listener that produced this error should be removed
    pub fn is_dead(&self) -> bool {
        matches!(self, DeliveryError::DeadObject)
    }
}

// ----------------------------------------------------------------------------
// Registry Errors
// ----------------------------------------------------------------------------

/// Core error type for registry, callback and coordinator operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HalError {
    #[error("{kind} object already exists: {key}")]
    AlreadyExists { kind: EntityKind, key: ObjectKey },

    #[error("{kind} object not found: {key}")]
    NotFound { kind: EntityKind, key: ObjectKey },

    #[error("Listener {endpoint} already registered for {scope}")]
    AlreadyRegistered { endpoint: EndpointId, scope: String },

    #[error("Listener {endpoint} not registered for {scope}")]
    ListenerNotFound { endpoint: EndpointId, scope: String },

    #[error("Too many listeners for {scope} (max {max})")]
    ListenerLimit { scope: String, max: usize },

    #[error("Unknown native interface: {ifname}")]
    UnknownInterface { ifname: String },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Channel communication error (control loop closed or full)
    #[error("Channel error: {message}")]
    Channel { message: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Failure reported by an external collaborator
    #[error("Backend error: {reason}")]
    Backend { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl HalError {
    pub fn already_exists(kind: EntityKind, key: &ObjectKey) -> Self {
        HalError::AlreadyExists {
            kind,
            key: key.clone(),
        }
    }

    pub fn not_found(kind: EntityKind, key: &ObjectKey) -> Self {
        HalError::NotFound {
            kind,
            key: key.clone(),
        }
    }

    pub fn invalid_state<T: Into<String>>(reason: T) -> Self {
        HalError::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument<T: Into<String>>(reason: T) -> Self {
        HalError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn channel_error<T: Into<String>>(message: T) -> Self {
        HalError::Channel {
            message: message.into(),
        }
    }

    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        HalError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn backend<T: Into<String>>(reason: T) -> Self {
        HalError::Backend {
            reason: reason.into(),
        }
    }

    /// Absence errors are benign on removal paths
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HalError::NotFound { .. } | HalError::ListenerNotFound { .. }
        )
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type HalResult<T> = core::result::Result<T, HalError>;
