//! Core types for the wifi-hal registry
//!
//! This module defines the identity keys every registry is keyed by, the entity
//! kinds those registries hold, and small newtypes (MAC addresses, endpoint ids)
//! shared by the event payloads.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HalError;

// ----------------------------------------------------------------------------
// Object Key
// ----------------------------------------------------------------------------

/// Identity of a registry entry: an interface name and, for network-scoped
/// entities, the numeric network id.
///
/// Equality and ordering are structural, so all networks of one interface sort
/// directly after the interface itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    iface_name: String,
    network_id: Option<u32>,
}

impl ObjectKey {
    /// Key for an interface-scoped entity
    pub fn iface(iface_name: impl Into<String>) -> Self {
        Self {
            iface_name: iface_name.into(),
            network_id: None,
        }
    }

    /// Key for a network-scoped entity
    pub fn network(iface_name: impl Into<String>, network_id: u32) -> Self {
        Self {
            iface_name: iface_name.into(),
            network_id: Some(network_id),
        }
    }

    pub fn iface_name(&self) -> &str {
        &self.iface_name
    }

    pub fn network_id(&self) -> Option<u32> {
        self.network_id
    }

    pub fn is_network(&self) -> bool {
        self.network_id.is_some()
    }

    /// Key of the interface owning this entry (itself for interface keys)
    pub fn parent(&self) -> ObjectKey {
        ObjectKey::iface(self.iface_name.clone())
    }

    /// Whether this key is a network living under the interface `iface_name`
    pub fn is_network_of(&self, iface_name: &str) -> bool {
        self.network_id.is_some() && self.iface_name == iface_name
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.network_id {
            Some(id) => write!(f, "{}_{}", self.iface_name, id),
            None => write!(f, "{}", self.iface_name),
        }
    }
}

// ----------------------------------------------------------------------------
// Entity Kinds
// ----------------------------------------------------------------------------

/// Kind of wrapper object held by a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    P2pIface,
    StaIface,
    P2pNetwork,
    StaNetwork,
    /// Vendor extension objects, shadowing a standard object of the same key
    VendorP2pIface,
    VendorStaIface,
    VendorStaNetwork,
    AccessPoint,
}

impl EntityKind {
    /// The supplicant-side kinds, in teardown order (networks first)
    pub const SUPPLICANT_TEARDOWN_ORDER: [EntityKind; 7] = [
        EntityKind::VendorStaNetwork,
        EntityKind::P2pNetwork,
        EntityKind::StaNetwork,
        EntityKind::VendorP2pIface,
        EntityKind::VendorStaIface,
        EntityKind::P2pIface,
        EntityKind::StaIface,
    ];

    pub fn is_network(&self) -> bool {
        matches!(
            self,
            EntityKind::P2pNetwork | EntityKind::StaNetwork | EntityKind::VendorStaNetwork
        )
    }

    pub fn is_vendor(&self) -> bool {
        matches!(
            self,
            EntityKind::VendorP2pIface | EntityKind::VendorStaIface | EntityKind::VendorStaNetwork
        )
    }

    /// Network kind living under this interface kind
    pub fn network_kind(&self) -> Option<EntityKind> {
        match self {
            EntityKind::P2pIface => Some(EntityKind::P2pNetwork),
            EntityKind::StaIface => Some(EntityKind::StaNetwork),
            EntityKind::VendorStaIface => Some(EntityKind::VendorStaNetwork),
            _ => None,
        }
    }

    /// Vendor extension object registered alongside this standard one.
    ///
    /// P2P networks have no vendor counterpart.
    pub fn vendor_kind(&self) -> Option<EntityKind> {
        match self {
            EntityKind::P2pIface => Some(EntityKind::VendorP2pIface),
            EntityKind::StaIface => Some(EntityKind::VendorStaIface),
            EntityKind::StaNetwork => Some(EntityKind::VendorStaNetwork),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::P2pIface => "p2p_iface",
            EntityKind::StaIface => "sta_iface",
            EntityKind::P2pNetwork => "p2p_network",
            EntityKind::StaNetwork => "sta_network",
            EntityKind::VendorP2pIface => "vendor_p2p_iface",
            EntityKind::VendorStaIface => "vendor_sta_iface",
            EntityKind::VendorStaNetwork => "vendor_sta_network",
            EntityKind::AccessPoint => "access_point",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a native interface as reported by the supplicant core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IfaceKind {
    /// Station (client) interface
    Sta,
    /// P2P device interface
    P2p,
}

impl IfaceKind {
    pub fn iface_entity(&self) -> EntityKind {
        match self {
            IfaceKind::Sta => EntityKind::StaIface,
            IfaceKind::P2p => EntityKind::P2pIface,
        }
    }

    pub fn network_entity(&self) -> EntityKind {
        match self {
            IfaceKind::Sta => EntityKind::StaNetwork,
            IfaceKind::P2p => EntityKind::P2pNetwork,
        }
    }
}

// ----------------------------------------------------------------------------
// Endpoint Identifier
// ----------------------------------------------------------------------------

/// Identity of a remote callback endpoint.
///
/// Two listener handles are the same listener iff their endpoints are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointId(Uuid);

impl EndpointId {
    /// Allocate a fresh endpoint id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EndpointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

// ----------------------------------------------------------------------------
// MAC Address
// ----------------------------------------------------------------------------

/// IEEE 802 MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    pub const ZERO: Self = Self([0; 6]);
    pub const BROADCAST: Self = Self([0xFF; 6]);

    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let octets: Vec<String> = self.0.iter().map(|b| hex::encode([*b])).collect();
        f.write_str(&octets.join(":"))
    }
}

impl FromStr for MacAddr {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        let bytes = hex::decode(&clean)
            .map_err(|_| HalError::invalid_argument(format!("invalid MAC address: {s}")))?;

        let octets: [u8; 6] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HalError::invalid_argument(format!("MAC address must be 6 bytes: {s}")))?;
        Ok(Self(octets))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
