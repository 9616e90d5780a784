//! wifi-hal Core
//!
//! Foundational types for the wifi-hal object registry: identity keys, the wire
//! enumerations shared with remote clients, the error taxonomy, configuration,
//! listener handles and the versioned event descriptors that the runtime fans out
//! to registered callbacks.
//!
//! The runtime crate (`wifi-hal-runtime`) owns the registries and the dispatcher;
//! this crate only defines the contracts they operate on.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod access_point;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod listener;
pub mod types;
pub mod version;
pub mod wire;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use access_point::{AccessPointParams, ChannelParams, HwModeParams, NetworkParams};
pub use config::{ChannelConfig, DispatchConfig, HalConfig, LoggingConfig, VendorConfig};
pub use context::{AccessPointBackend, DebugParams, SupplicantGlobal, Terminator};
pub use errors::{DeliveryError, HalError, HalResult};
pub use events::{
    HostapdCall, HostapdEvent, P2pIfaceCall, P2pIfaceEvent, P2pNetworkCall, StaIfaceCall,
    StaIfaceEvent, StaNetworkCall, StaNetworkEvent, SupplicantCall, SupplicantEvent,
    VendorP2pIfaceCall, VendorP2pIfaceEvent, VendorStaIfaceCall, VendorStaIfaceEvent,
};
pub use listener::{ListenerHandle, RemoteCallback};
pub use types::{EndpointId, EntityKind, IfaceKind, MacAddr, ObjectKey};
pub use version::{CallbackContract, ContractVersion, VersionedEvent};
