//! Versioned event descriptors
//!
//! Each listener kind has two enums: an `*Event` describing what happened, in
//! the richest form available, and a `*Call` naming every call shape the
//! contract declares across its generations. `VersionedEvent::shape_at` maps an
//! event onto the call shape declared at one generation; the dispatcher walks a
//! listener's probe order to pick the newest one.

pub mod hostapd;
pub mod p2p_iface;
pub mod p2p_network;
pub mod sta_iface;
pub mod sta_network;
pub mod supplicant;
pub mod vendor;

pub use hostapd::{ApInfo, HostapdCall, HostapdEvent};
pub use p2p_iface::{P2pDeviceInfo, P2pGroupInfo, P2pIfaceCall, P2pIfaceEvent};
pub use p2p_network::P2pNetworkCall;
pub use sta_iface::{
    AnqpData, AssocRejectData, BssTmData, DppConfiguration, Hs20AnqpData, StaIfaceCall,
    StaIfaceEvent, StateChange,
};
pub use sta_network::{StaNetworkCall, StaNetworkEvent};
pub use supplicant::{SupplicantCall, SupplicantEvent};
pub use vendor::{
    VendorDppConfig, VendorP2pIfaceCall, VendorP2pIfaceEvent, VendorStaIfaceCall,
    VendorStaIfaceEvent,
};
