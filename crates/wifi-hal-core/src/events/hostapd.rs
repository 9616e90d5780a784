//! Hostapd access point events

use serde::{Deserialize, Serialize};

use crate::types::MacAddr;
use crate::version::{CallbackContract, ContractVersion, VersionedEvent};
use crate::wire::{Bandwidth, WifiGeneration};

/// Operating parameters of one access point instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApInfo {
    pub ifname: String,
    pub instance_name: String,
    pub freq_mhz: u32,
    pub bandwidth: Bandwidth,
    pub generation: WifiGeneration,
    pub bssid: MacAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostapdEvent {
    /// An access point (or one instance of a bridged one) failed
    Failure {
        ifname: String,
        instance_name: String,
    },
    ApInstanceInfoChanged(ApInfo),
    ConnectedClientsChanged {
        ifname: String,
        instance_name: String,
        client_address: MacAddr,
        is_connected: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostapdCall {
    Failure {
        ifname: String,
    },
    /// 1.3
    FailureWithInstance {
        ifname: String,
        instance_name: String,
    },
    /// 1.3
    ApInstanceInfoChanged(ApInfo),
    /// 1.3
    ConnectedClientsChanged {
        ifname: String,
        instance_name: String,
        client_address: MacAddr,
        is_connected: bool,
    },
}

impl CallbackContract for HostapdCall {
    const NAME: &'static str = "hostapd";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_1, ContractVersion::V1_3];

    fn method(&self) -> &'static str {
        match self {
            HostapdCall::Failure { .. } => "on_failure",
            HostapdCall::FailureWithInstance { .. } => "on_failure_1_3",
            HostapdCall::ApInstanceInfoChanged(_) => "on_ap_instance_info_changed",
            HostapdCall::ConnectedClientsChanged { .. } => "on_connected_clients_changed",
        }
    }
}

impl VersionedEvent for HostapdEvent {
    type Call = HostapdCall;

    fn name(&self) -> &'static str {
        match self {
            HostapdEvent::Failure { .. } => "failure",
            HostapdEvent::ApInstanceInfoChanged(_) => "ap_instance_info_changed",
            HostapdEvent::ConnectedClientsChanged { .. } => "connected_clients_changed",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<HostapdCall> {
        match (self, version) {
            (
                HostapdEvent::Failure {
                    ifname,
                    instance_name,
                },
                ContractVersion::V1_3,
            ) => Some(HostapdCall::FailureWithInstance {
                ifname: ifname.clone(),
                instance_name: instance_name.clone(),
            }),
            (HostapdEvent::Failure { ifname, .. }, ContractVersion::V1_1) => {
                Some(HostapdCall::Failure {
                    ifname: ifname.clone(),
                })
            }
            (HostapdEvent::ApInstanceInfoChanged(info), ContractVersion::V1_3) => {
                Some(HostapdCall::ApInstanceInfoChanged(info.clone()))
            }
            (
                HostapdEvent::ConnectedClientsChanged {
                    ifname,
                    instance_name,
                    client_address,
                    is_connected,
                },
                ContractVersion::V1_3,
            ) => Some(HostapdCall::ConnectedClientsChanged {
                ifname: ifname.clone(),
                instance_name: instance_name.clone(),
                client_address: *client_address,
                is_connected: *is_connected,
            }),
            _ => None,
        }
    }
}
