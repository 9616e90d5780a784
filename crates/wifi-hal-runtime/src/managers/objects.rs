//! Wrapper object registry
//!
//! One `ObjectStore` per entity kind maps identity keys to the wrapper objects
//! handed out to clients. A store never holds two wrappers for one key, and a
//! destroyed wrapper is invalidated so stale references can tell.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use wifi_hal_core::{EntityKind, HalError, HalResult, ObjectKey};

// ----------------------------------------------------------------------------
// Wrapper Object
// ----------------------------------------------------------------------------

/// Per-identity wrapper for a native interface, network or access point.
///
/// The wrapper does not own the native resource; it resolves it by identity.
/// Its key is fixed at creation, so a network wrapper keeps the id it was
/// registered with even if the native network is later renumbered.
#[derive(Debug)]
pub struct HalObject {
    kind: EntityKind,
    key: ObjectKey,
    valid: AtomicBool,
}

impl HalObject {
    fn new(kind: EntityKind, key: ObjectKey) -> Self {
        Self {
            kind,
            key,
            valid: AtomicBool::new(true),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// False once the wrapper has been destroyed
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

// ----------------------------------------------------------------------------
// Object Store
// ----------------------------------------------------------------------------

/// Lifetime counters for one store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectStats {
    pub created: u64,
    pub destroyed: u64,
    pub rejected_duplicates: u64,
}

/// Keyed store of wrappers of a single kind
#[derive(Debug)]
pub struct ObjectStore {
    kind: EntityKind,
    objects: BTreeMap<ObjectKey, Arc<HalObject>>,
    stats: ObjectStats,
}

impl ObjectStore {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            objects: BTreeMap::new(),
            stats: ObjectStats::default(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Create the wrapper for `key`; fails if one already exists
    pub fn create(&mut self, key: ObjectKey) -> HalResult<Arc<HalObject>> {
        if self.objects.contains_key(&key) {
            self.stats.rejected_duplicates += 1;
            return Err(HalError::already_exists(self.kind, &key));
        }

        let object = Arc::new(HalObject::new(self.kind, key.clone()));
        self.objects.insert(key, Arc::clone(&object));
        self.stats.created += 1;
        debug!("Created {} object {}", self.kind, object.key());
        Ok(object)
    }

    pub fn lookup(&self, key: &ObjectKey) -> HalResult<Arc<HalObject>> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| HalError::not_found(self.kind, key))
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Remove and invalidate the wrapper for `key`, if any
    pub fn destroy(&mut self, key: &ObjectKey) -> Option<Arc<HalObject>> {
        let object = self.objects.remove(key)?;
        object.invalidate();
        self.stats.destroyed += 1;
        debug!("Destroyed {} object {}", self.kind, key);
        Some(object)
    }

    /// Keys of every network registered under the interface `ifname`
    pub fn networks_of(&self, ifname: &str) -> Vec<ObjectKey> {
        self.objects
            .range(ObjectKey::iface(ifname)..)
            .map(|(key, _)| key)
            .skip_while(|key| !key.is_network())
            .take_while(|key| key.is_network_of(ifname))
            .cloned()
            .collect()
    }

    /// Keys in identity order
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.objects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn stats(&self) -> &ObjectStats {
        &self.stats
    }
}

// ----------------------------------------------------------------------------
// Object Registry
// ----------------------------------------------------------------------------

/// The supplicant-side stores, standard and vendor, addressed by entity kind
#[derive(Debug)]
pub struct ObjectRegistry {
    p2p_ifaces: ObjectStore,
    sta_ifaces: ObjectStore,
    p2p_networks: ObjectStore,
    sta_networks: ObjectStore,
    vendor_p2p_ifaces: ObjectStore,
    vendor_sta_ifaces: ObjectStore,
    vendor_sta_networks: ObjectStore,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            p2p_ifaces: ObjectStore::new(EntityKind::P2pIface),
            sta_ifaces: ObjectStore::new(EntityKind::StaIface),
            p2p_networks: ObjectStore::new(EntityKind::P2pNetwork),
            sta_networks: ObjectStore::new(EntityKind::StaNetwork),
            vendor_p2p_ifaces: ObjectStore::new(EntityKind::VendorP2pIface),
            vendor_sta_ifaces: ObjectStore::new(EntityKind::VendorStaIface),
            vendor_sta_networks: ObjectStore::new(EntityKind::VendorStaNetwork),
        }
    }

    pub fn store(&self, kind: EntityKind) -> HalResult<&ObjectStore> {
        match kind {
            EntityKind::P2pIface => Ok(&self.p2p_ifaces),
            EntityKind::StaIface => Ok(&self.sta_ifaces),
            EntityKind::P2pNetwork => Ok(&self.p2p_networks),
            EntityKind::StaNetwork => Ok(&self.sta_networks),
            EntityKind::VendorP2pIface => Ok(&self.vendor_p2p_ifaces),
            EntityKind::VendorStaIface => Ok(&self.vendor_sta_ifaces),
            EntityKind::VendorStaNetwork => Ok(&self.vendor_sta_networks),
            EntityKind::AccessPoint => Err(HalError::invalid_argument(
                "access points are not held by the supplicant registry",
            )),
        }
    }

    pub fn store_mut(&mut self, kind: EntityKind) -> HalResult<&mut ObjectStore> {
        match kind {
            EntityKind::P2pIface => Ok(&mut self.p2p_ifaces),
            EntityKind::StaIface => Ok(&mut self.sta_ifaces),
            EntityKind::P2pNetwork => Ok(&mut self.p2p_networks),
            EntityKind::StaNetwork => Ok(&mut self.sta_networks),
            EntityKind::VendorP2pIface => Ok(&mut self.vendor_p2p_ifaces),
            EntityKind::VendorStaIface => Ok(&mut self.vendor_sta_ifaces),
            EntityKind::VendorStaNetwork => Ok(&mut self.vendor_sta_networks),
            EntityKind::AccessPoint => Err(HalError::invalid_argument(
                "access points are not held by the supplicant registry",
            )),
        }
    }

    pub fn create(&mut self, kind: EntityKind, key: ObjectKey) -> HalResult<Arc<HalObject>> {
        self.store_mut(kind)?.create(key)
    }

    pub fn lookup(&self, kind: EntityKind, key: &ObjectKey) -> HalResult<Arc<HalObject>> {
        self.store(kind)?.lookup(key)
    }

    pub fn contains(&self, kind: EntityKind, key: &ObjectKey) -> bool {
        self.store(kind).map(|store| store.contains(key)).unwrap_or(false)
    }

    /// Destroy without touching callbacks; the coordinator owns the cascade
    pub fn destroy(&mut self, kind: EntityKind, key: &ObjectKey) -> Option<Arc<HalObject>> {
        self.store_mut(kind).ok()?.destroy(key)
    }

    /// Kind of the interface registered under `ifname`, if any
    pub fn iface_kind_of(&self, ifname: &str) -> Option<EntityKind> {
        let key = ObjectKey::iface(ifname);
        [EntityKind::P2pIface, EntityKind::StaIface]
            .into_iter()
            .find(|kind| self.contains(*kind, &key))
    }

    /// Total wrappers across all stores
    pub fn len(&self) -> usize {
        self.p2p_ifaces.len()
            + self.sta_ifaces.len()
            + self.p2p_networks.len()
            + self.sta_networks.len()
            + self.vendor_len()
    }

    /// Wrappers held by the vendor stores
    pub fn vendor_len(&self) -> usize {
        self.vendor_p2p_ifaces.len()
            + self.vendor_sta_ifaces.len()
            + self.vendor_sta_networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
