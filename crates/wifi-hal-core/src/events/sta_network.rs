//! Station network events

use serde::{Deserialize, Serialize};

use crate::version::{CallbackContract, ContractVersion, VersionedEvent};

/// Requests raised by the EAP peer for one configured network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaNetworkEvent {
    EapSimGsmAuthRequest { rands: Vec<[u8; 16]> },
    EapSimUmtsAuthRequest { rand: [u8; 16], autn: [u8; 16] },
    EapIdentityRequest,
    /// WPA3 transition-disable indication bitmap
    TransitionDisable { indication: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaNetworkCall {
    EapSimGsmAuthRequest { rands: Vec<[u8; 16]> },
    EapSimUmtsAuthRequest { rand: [u8; 16], autn: [u8; 16] },
    EapIdentityRequest,
    /// 1.4
    TransitionDisable { indication: u8 },
}

impl CallbackContract for StaNetworkCall {
    const NAME: &'static str = "sta_network";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0, ContractVersion::V1_4];

    fn method(&self) -> &'static str {
        match self {
            StaNetworkCall::EapSimGsmAuthRequest { .. } => "on_network_eap_sim_gsm_auth_request",
            StaNetworkCall::EapSimUmtsAuthRequest { .. } => "on_network_eap_sim_umts_auth_request",
            StaNetworkCall::EapIdentityRequest => "on_network_eap_identity_request",
            StaNetworkCall::TransitionDisable { .. } => "on_transition_disable",
        }
    }
}

impl VersionedEvent for StaNetworkEvent {
    type Call = StaNetworkCall;

    fn name(&self) -> &'static str {
        match self {
            StaNetworkEvent::EapSimGsmAuthRequest { .. } => "eap_sim_gsm_auth_request",
            StaNetworkEvent::EapSimUmtsAuthRequest { .. } => "eap_sim_umts_auth_request",
            StaNetworkEvent::EapIdentityRequest => "eap_identity_request",
            StaNetworkEvent::TransitionDisable { .. } => "transition_disable",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<StaNetworkCall> {
        match (self, version) {
            (StaNetworkEvent::EapSimGsmAuthRequest { rands }, ContractVersion::V1_0) => {
                Some(StaNetworkCall::EapSimGsmAuthRequest {
                    rands: rands.clone(),
                })
            }
            (StaNetworkEvent::EapSimUmtsAuthRequest { rand, autn }, ContractVersion::V1_0) => {
                Some(StaNetworkCall::EapSimUmtsAuthRequest {
                    rand: *rand,
                    autn: *autn,
                })
            }
            (StaNetworkEvent::EapIdentityRequest, ContractVersion::V1_0) => {
                Some(StaNetworkCall::EapIdentityRequest)
            }
            (StaNetworkEvent::TransitionDisable { indication }, ContractVersion::V1_4) => {
                Some(StaNetworkCall::TransitionDisable {
                    indication: *indication,
                })
            }
            _ => None,
        }
    }
}
