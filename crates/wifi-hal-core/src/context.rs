//! Collaborator traits
//!
//! The registry never owns native interfaces, networks or access points. It
//! reaches the components that do through these narrow traits, borrowed for the
//! lifetime of the enclosing process context.

use serde::{Deserialize, Serialize};

use crate::access_point::AccessPointParams;
use crate::errors::HalResult;
use crate::types::{IfaceKind, MacAddr};
use crate::wire::{DebugLevel, Ieee80211ReasonCode};

/// Supplicant debug settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugParams {
    pub level: DebugLevel,
    pub show_timestamp: bool,
    pub show_keys: bool,
}

/// Native supplicant global context
pub trait SupplicantGlobal {
    /// Role of a live native interface, `None` if the name is unknown
    fn interface_kind(&self, ifname: &str) -> Option<IfaceKind>;

    /// P2P device interface owning the group interface `ifname`, if it is one
    fn p2p_group_parent(&self, ifname: &str) -> Option<String>;

    fn set_debug_params(&self, params: DebugParams) -> HalResult<()>;
}

/// Process termination hook used by the death-watch
pub trait Terminator {
    fn terminate(&self, reason: &str);
}

/// Native access point control
pub trait AccessPointBackend {
    fn start_access_point(&self, params: &AccessPointParams) -> HalResult<()>;

    fn stop_access_point(&self, ifname: &str) -> HalResult<()>;

    /// Member interfaces of a bridge created for a dual-band access point
    fn interfaces_in_bridge(&self, bridge: &str) -> HalResult<Vec<String>>;

    fn force_client_disconnect(
        &self,
        ifname: &str,
        client: MacAddr,
        reason: Ieee80211ReasonCode,
    ) -> HalResult<()>;

    fn set_debug_level(&self, level: DebugLevel) -> HalResult<()>;
}
