//! Listener handles
//!
//! A `ListenerHandle` is an opaque reference to a remote callback endpoint,
//! tagged with the contract generation it registered under.

use core::fmt;
use std::sync::Arc;

use crate::errors::DeliveryError;
use crate::types::EndpointId;
use crate::version::ContractVersion;

// ----------------------------------------------------------------------------
// Remote Callback
// ----------------------------------------------------------------------------

/// Transport-side endpoint able to receive calls of contract `C`
///
/// `invoke` may block on transport I/O. It is never called concurrently for the
/// same dispatch.
pub trait RemoteCallback<C>: Send + Sync {
    fn invoke(&self, call: C) -> Result<(), DeliveryError>;
}

impl<C, F> RemoteCallback<C> for F
where
    F: Fn(C) -> Result<(), DeliveryError> + Send + Sync,
{
    fn invoke(&self, call: C) -> Result<(), DeliveryError> {
        self(call)
    }
}

// ----------------------------------------------------------------------------
// Listener Handle
// ----------------------------------------------------------------------------

/// A registered listener: endpoint identity, contract generation and transport
pub struct ListenerHandle<C> {
    endpoint: EndpointId,
    version: ContractVersion,
    remote: Arc<dyn RemoteCallback<C>>,
}

impl<C> ListenerHandle<C> {
    pub fn new(
        endpoint: EndpointId,
        version: ContractVersion,
        remote: Arc<dyn RemoteCallback<C>>,
    ) -> Self {
        Self {
            endpoint,
            version,
            remote,
        }
    }

    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    pub fn version(&self) -> ContractVersion {
        self.version
    }

    /// Deliver one call to the remote endpoint
    pub fn invoke(&self, call: C) -> Result<(), DeliveryError> {
        self.remote.invoke(call)
    }
}

impl<C> Clone for ListenerHandle<C> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint,
            version: self.version,
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<C> PartialEq for ListenerHandle<C> {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
    }
}

impl<C> Eq for ListenerHandle<C> {}

impl<C> fmt::Debug for ListenerHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
