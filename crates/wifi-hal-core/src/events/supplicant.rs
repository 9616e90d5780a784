//! Process-wide supplicant events, delivered to global listeners

use serde::{Deserialize, Serialize};

use crate::version::{CallbackContract, ContractVersion, VersionedEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplicantEvent {
    InterfaceCreated { ifname: String },
    InterfaceRemoved { ifname: String },
    Terminating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplicantCall {
    InterfaceCreated { ifname: String },
    InterfaceRemoved { ifname: String },
    Terminating,
}

impl CallbackContract for SupplicantCall {
    const NAME: &'static str = "supplicant";
    const VERSIONS: &'static [ContractVersion] = &[ContractVersion::V1_0];

    fn method(&self) -> &'static str {
        match self {
            SupplicantCall::InterfaceCreated { .. } => "on_interface_created",
            SupplicantCall::InterfaceRemoved { .. } => "on_interface_removed",
            SupplicantCall::Terminating => "on_terminating",
        }
    }
}

impl VersionedEvent for SupplicantEvent {
    type Call = SupplicantCall;

    fn name(&self) -> &'static str {
        match self {
            SupplicantEvent::InterfaceCreated { .. } => "interface_created",
            SupplicantEvent::InterfaceRemoved { .. } => "interface_removed",
            SupplicantEvent::Terminating => "terminating",
        }
    }

    fn shape_at(&self, version: ContractVersion) -> Option<SupplicantCall> {
        if version != ContractVersion::V1_0 {
            return None;
        }
        let call = match self {
            SupplicantEvent::InterfaceCreated { ifname } => SupplicantCall::InterfaceCreated {
                ifname: ifname.clone(),
            },
            SupplicantEvent::InterfaceRemoved { ifname } => SupplicantCall::InterfaceRemoved {
                ifname: ifname.clone(),
            },
            SupplicantEvent::Terminating => SupplicantCall::Terminating,
        };
        Some(call)
    }
}
