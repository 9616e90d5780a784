//! Vendor extension events
//!
//! The vendor service shadows station and P2P interfaces with objects of its
//! own and carries events the standard contracts have no shape for, such as the
//! DPP connector configuration. Vendor contracts have a single generation.

use serde::{Deserialize, Serialize};

use crate::events::p2p_iface::P2pDeviceInfo;
use crate::version::{CallbackContract, ContractVersion, VersionedEvent};
use crate::wire::DppAkm;

// ----------------------------------------------------------------------------
// Payloads
// ----------------------------------------------------------------------------

/// Configuration handed over by a DPP configurator, connector included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorDppConfig {
    pub akm: DppAkm,
    pub ssid: Vec<u8>,
    pub connector: Option<String>,
    pub c_sign_key: Vec<u8>,
    pub net_access_key: Vec<u8>,
    /// Seconds since the epoch; zero when the key never expires
    pub net_access_expiry: u32,
    pub passphrase: String,
    /// Raw PSK, when the configurator sent one instead of a passphrase
    pub psk: Option<Vec<u8>>,
}

// ----------------------------------------------------------------------------
// Station Interface
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorStaIfaceEvent {
    DppAuthSuccess { initiator: bool },
    DppConfigReceived(VendorDppConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorStaIfaceCall {
    DppAuthSuccess { initiator: bool },
    DppConfig(VendorDppConfig),
}

impl CallbackContract for VendorStaIfaceCall {
    const NAME: &'static str = "vendor_sta_iface";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0];

    fn method(&self) -> &'static str {
        match self {
            VendorStaIfaceCall::DppAuthSuccess { .. } => "on_dpp_auth_success",
            VendorStaIfaceCall::DppConfig(_) => "on_dpp_config",
        }
    }
}

impl VersionedEvent for VendorStaIfaceEvent {
    type Call = VendorStaIfaceCall;

    fn name(&self) -> &'static str {
        match self {
            VendorStaIfaceEvent::DppAuthSuccess { .. } => "dpp_auth_success",
            VendorStaIfaceEvent::DppConfigReceived(_) => "dpp_config_received",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<VendorStaIfaceCall> {
        if version != ContractVersion::V1_0 {
            return None;
        }
        let call = match self {
            VendorStaIfaceEvent::DppAuthSuccess { initiator } => {
                VendorStaIfaceCall::DppAuthSuccess {
                    initiator: *initiator,
                }
            }
            VendorStaIfaceEvent::DppConfigReceived(config) => {
                VendorStaIfaceCall::DppConfig(config.clone())
            }
        };
        Some(call)
    }
}

// ----------------------------------------------------------------------------
// P2P Interface
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorP2pIfaceEvent {
    /// Discovery of a Wi-Fi Display R2 capable peer
    R2DeviceFound(P2pDeviceInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorP2pIfaceCall {
    R2DeviceFound(P2pDeviceInfo),
}

impl CallbackContract for VendorP2pIfaceCall {
    const NAME: &'static str = "vendor_p2p_iface";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0];

    fn method(&self) -> &'static str {
        match self {
            VendorP2pIfaceCall::R2DeviceFound(_) => "on_r2_device_found",
        }
    }
}

impl VersionedEvent for VendorP2pIfaceEvent {
    type Call = VendorP2pIfaceCall;

    fn name(&self) -> &'static str {
        match self {
            VendorP2pIfaceEvent::R2DeviceFound(_) => "r2_device_found",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<VendorP2pIfaceCall> {
        match (self, version) {
            // Peers without the R2 subelement are reported on the standard path only
            (VendorP2pIfaceEvent::R2DeviceFound(info), ContractVersion::V1_0) => info
                .wfd_r2_device_info
                .is_some()
                .then(|| VendorP2pIfaceCall::R2DeviceFound(info.clone())),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MacAddr;

    fn dpp_config() -> VendorDppConfig {
        VendorDppConfig {
            akm: DppAkm::Dpp,
            ssid: b"Lab".to_vec(),
            connector: Some("eyJ0eXAiOiJkcHBDb24ifQ".into()),
            c_sign_key: vec![0x30, 0x39],
            net_access_key: vec![0x30, 0x77],
            net_access_expiry: 0,
            passphrase: String::new(),
            psk: None,
        }
    }

    #[test]
    fn test_sta_events_have_one_generation() {
        let event = VendorStaIfaceEvent::DppConfigReceived(dpp_config());
        let (version, call) = event.select(ContractVersion::V1_0).unwrap();

        assert_eq!(version, ContractVersion::V1_0);
        assert_eq!(call.method(), "on_dpp_config");
        assert!(!VendorStaIfaceCall::supports(ContractVersion::V1_4));
        assert_eq!(
            VendorStaIfaceEvent::DppAuthSuccess { initiator: true }.name(),
            "dpp_auth_success"
        );
    }

    #[test]
    fn test_r2_device_found_needs_r2_info() {
        let mut info = P2pDeviceInfo {
            src_address: MacAddr::new([0x02, 0, 0, 0, 0, 4]),
            p2p_device_address: MacAddr::new([0x06, 0, 0, 0, 0, 4]),
            primary_device_type: [0; 8],
            device_name: "tv".into(),
            config_methods: 0x0080,
            device_capabilities: 0x25,
            group_capabilities: 0,
            wfd_device_info: vec![0, 6],
            wfd_r2_device_info: Some(vec![0, 2]),
        };

        let event = VendorP2pIfaceEvent::R2DeviceFound(info.clone());
        assert!(matches!(
            event.select(ContractVersion::V1_0),
            Some((_, VendorP2pIfaceCall::R2DeviceFound(_)))
        ));

        info.wfd_r2_device_info = None;
        assert!(VendorP2pIfaceEvent::R2DeviceFound(info)
            .select(ContractVersion::V1_0)
            .is_none());
    }
}
