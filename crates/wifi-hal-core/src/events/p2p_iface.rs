//! P2P device interface events
//!
//! Events raised on a P2P group interface are routed by the coordinator to the
//! P2P device interface that owns the group; listeners only ever register on
//! the device interface.

use serde::{Deserialize, Serialize};

use crate::types::MacAddr;
use crate::version::{CallbackContract, ContractVersion, VersionedEvent};
use crate::wire::{P2pProvDiscStatusCode, P2pStatusCode, WpsDevPasswordId};

// ----------------------------------------------------------------------------
// Payloads
// ----------------------------------------------------------------------------

/// A peer found during P2P discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P2pDeviceInfo {
    pub src_address: MacAddr,
    pub p2p_device_address: MacAddr,
    pub primary_device_type: [u8; 8],
    pub device_name: String,
    pub config_methods: u16,
    pub device_capabilities: u8,
    pub group_capabilities: u32,
    pub wfd_device_info: Vec<u8>,
    /// Wi-Fi Display R2 subelement; only 1.4 listeners can receive it
    pub wfd_r2_device_info: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P2pGroupInfo {
    pub group_ifname: String,
    pub is_group_owner: bool,
    pub ssid: Vec<u8>,
    pub frequency: u32,
    pub psk: Vec<u8>,
    pub passphrase: String,
    pub go_device_address: MacAddr,
    pub is_persistent: bool,
}

// ----------------------------------------------------------------------------
// Events
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum P2pIfaceEvent {
    NetworkAdded {
        network_id: u32,
    },
    NetworkRemoved {
        network_id: u32,
    },
    DeviceFound(P2pDeviceInfo),
    DeviceLost {
        p2p_device_address: MacAddr,
    },
    FindStopped,
    GoNegotiationRequest {
        src_address: MacAddr,
        password_id: WpsDevPasswordId,
    },
    GoNegotiationCompleted {
        status: P2pStatusCode,
    },
    GroupFormationSuccess,
    GroupFormationFailure {
        reason: String,
    },
    GroupStarted(P2pGroupInfo),
    GroupRemoved {
        group_ifname: String,
        is_group_owner: bool,
    },
    InvitationReceived {
        src_address: MacAddr,
        go_device_address: MacAddr,
        bssid: MacAddr,
        persistent_network_id: u32,
        operating_frequency: u32,
    },
    InvitationResult {
        bssid: MacAddr,
        status: P2pStatusCode,
    },
    ProvisionDiscoveryCompleted {
        p2p_device_address: MacAddr,
        is_request: bool,
        status: P2pProvDiscStatusCode,
        config_methods: u16,
        generated_pin: String,
    },
    ServiceDiscoveryResponse {
        src_address: MacAddr,
        update_indicator: u16,
        tlvs: Vec<u8>,
    },
    StaAuthorized {
        src_address: MacAddr,
        p2p_device_address: MacAddr,
    },
    StaDeauthorized {
        src_address: MacAddr,
        p2p_device_address: MacAddr,
    },
}

// ----------------------------------------------------------------------------
// Call Shapes
// ----------------------------------------------------------------------------

/// Call shapes of the P2P interface contract.
///
/// Apart from device discovery every call is declared once at 1.0 and carries
/// the event payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum P2pIfaceCall {
    /// 1.0 discovery; the R2 subelement is never present
    DeviceFound(P2pDeviceInfo),
    /// 1.4 discovery carrying the R2 subelement
    R2DeviceFound(P2pDeviceInfo),
    /// Any other event, unchanged since 1.0
    Event(P2pIfaceEvent),
}

impl CallbackContract for P2pIfaceCall {
    const NAME: &'static str = "p2p_iface";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0, ContractVersion::V1_4];

    fn method(&self) -> &'static str {
        match self {
            P2pIfaceCall::DeviceFound(_) => "on_device_found",
            P2pIfaceCall::R2DeviceFound(_) => "on_r2_device_found",
            P2pIfaceCall::Event(event) => event.callback_method(),
        }
    }
}

impl P2pIfaceEvent {
    /// Callback method that carries this event unchanged
    fn callback_method(&self) -> &'static str {
        match self {
            P2pIfaceEvent::NetworkAdded { .. } => "on_network_added",
            P2pIfaceEvent::NetworkRemoved { .. } => "on_network_removed",
            P2pIfaceEvent::DeviceFound(_) => "on_device_found",
            P2pIfaceEvent::DeviceLost { .. } => "on_device_lost",
            P2pIfaceEvent::FindStopped => "on_find_stopped",
            P2pIfaceEvent::GoNegotiationRequest { .. } => "on_go_negotiation_request",
            P2pIfaceEvent::GoNegotiationCompleted { .. } => "on_go_negotiation_completed",
            P2pIfaceEvent::GroupFormationSuccess => "on_group_formation_success",
            P2pIfaceEvent::GroupFormationFailure { .. } => "on_group_formation_failure",
            P2pIfaceEvent::GroupStarted(_) => "on_group_started",
            P2pIfaceEvent::GroupRemoved { .. } => "on_group_removed",
            P2pIfaceEvent::InvitationReceived { .. } => "on_invitation_received",
            P2pIfaceEvent::InvitationResult { .. } => "on_invitation_result",
            P2pIfaceEvent::ProvisionDiscoveryCompleted { .. } => {
                "on_provision_discovery_completed"
            }
            P2pIfaceEvent::ServiceDiscoveryResponse { .. } => "on_service_discovery_response",
            P2pIfaceEvent::StaAuthorized { .. } => "on_sta_authorized",
            P2pIfaceEvent::StaDeauthorized { .. } => "on_sta_deauthorized",
        }
    }
}

impl VersionedEvent for P2pIfaceEvent {
    type Call = P2pIfaceCall;

    fn name(&self) -> &'static str {
        match self {
            P2pIfaceEvent::NetworkAdded { .. } => "network_added",
            P2pIfaceEvent::NetworkRemoved { .. } => "network_removed",
            P2pIfaceEvent::DeviceFound(_) => "device_found",
            P2pIfaceEvent::DeviceLost { .. } => "device_lost",
            P2pIfaceEvent::FindStopped => "find_stopped",
            P2pIfaceEvent::GoNegotiationRequest { .. } => "go_negotiation_request",
            P2pIfaceEvent::GoNegotiationCompleted { .. } => "go_negotiation_completed",
            P2pIfaceEvent::GroupFormationSuccess => "group_formation_success",
            P2pIfaceEvent::GroupFormationFailure { .. } => "group_formation_failure",
            P2pIfaceEvent::GroupStarted(_) => "group_started",
            P2pIfaceEvent::GroupRemoved { .. } => "group_removed",
            P2pIfaceEvent::InvitationReceived { .. } => "invitation_received",
            P2pIfaceEvent::InvitationResult { .. } => "invitation_result",
            P2pIfaceEvent::ProvisionDiscoveryCompleted { .. } => "provision_discovery_completed",
            P2pIfaceEvent::ServiceDiscoveryResponse { .. } => "service_discovery_response",
            P2pIfaceEvent::StaAuthorized { .. } => "sta_authorized",
            P2pIfaceEvent::StaDeauthorized { .. } => "sta_deauthorized",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<P2pIfaceCall> {
        match (self, version) {
            (P2pIfaceEvent::DeviceFound(info), ContractVersion::V1_4) => info
                .wfd_r2_device_info
                .is_some()
                .then(|| P2pIfaceCall::R2DeviceFound(info.clone())),
            (P2pIfaceEvent::DeviceFound(info), ContractVersion::V1_0) => {
                Some(P2pIfaceCall::DeviceFound(P2pDeviceInfo {
                    wfd_r2_device_info: None,
                    ..info.clone()
                }))
            }
            (P2pIfaceEvent::DeviceFound(_), _) => None,
            (event, ContractVersion::V1_0) => Some(P2pIfaceCall::Event(event.clone())),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
