//! Lifecycle coordinator
//!
//! `HalManager` owns the object registry, every callback store, the dispatcher
//! and the death-watch. The supplicant core drives it through registration and
//! `notify_*` calls; remote clients reach it through callback registration.
//!
//! With the vendor service enabled, every station interface, station network
//! and P2P interface also gets a vendor wrapper under the same key. The vendor
//! wrapper and its listeners live and die with the standard one.
//!
//! All mutation goes through `&mut self`, so registry updates and dispatch are
//! serialized on whichever task owns the manager (normally `ControlLoop`).
//! Listeners that want to re-enter the coordinator during a fan-out send a
//! command instead; it runs after the fan-out completes.

use std::sync::Arc;

use tracing::{debug, info, warn};
use wifi_hal_core::{
    DebugParams, EndpointId, EntityKind, HalConfig, HalError, HalResult, ListenerHandle,
    ObjectKey, P2pIfaceCall, P2pIfaceEvent, P2pNetworkCall, StaIfaceCall, StaIfaceEvent,
    StaNetworkCall, StaNetworkEvent, SupplicantCall, SupplicantEvent, SupplicantGlobal,
    Terminator, VendorP2pIfaceCall, VendorP2pIfaceEvent, VendorStaIfaceCall, VendorStaIfaceEvent,
    VersionedEvent,
};

use crate::death_watch::DeathWatch;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::managers::{CallbackStore, HalObject, ListenerList, ObjectRegistry, ObjectStore};

const GLOBAL_SCOPE: &str = "supplicant";

// ----------------------------------------------------------------------------
// Statistics
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerStats {
    pub interfaces_registered: u64,
    pub interfaces_removed: u64,
    pub networks_registered: u64,
    pub networks_removed: u64,
    pub events_dispatched: u64,
    pub deliveries: u64,
    pub skipped_deliveries: u64,
    pub failed_deliveries: u64,
    pub listeners_pruned: u64,
}

// ----------------------------------------------------------------------------
// HAL Manager
// ----------------------------------------------------------------------------

/// Coordinator for supplicant interfaces, networks and their listeners
pub struct HalManager<'g> {
    /// Native global context, valid for the lifetime of the process context
    global: &'g dyn SupplicantGlobal,
    objects: ObjectRegistry,
    supplicant_callbacks: ListenerList<SupplicantCall>,
    sta_iface_callbacks: CallbackStore<StaIfaceCall>,
    p2p_iface_callbacks: CallbackStore<P2pIfaceCall>,
    sta_network_callbacks: CallbackStore<StaNetworkCall>,
    p2p_network_callbacks: CallbackStore<P2pNetworkCall>,
    vendor_sta_iface_callbacks: CallbackStore<VendorStaIfaceCall>,
    vendor_p2p_iface_callbacks: CallbackStore<VendorP2pIfaceCall>,
    vendor_enabled: bool,
    dispatcher: Dispatcher,
    death_watch: DeathWatch<'g>,
    max_listeners: usize,
    stats: ManagerStats,
}

impl<'g> HalManager<'g> {
    pub fn new(
        global: &'g dyn SupplicantGlobal,
        terminator: &'g dyn Terminator,
        config: &HalConfig,
    ) -> Self {
        let max = config.dispatch.max_listeners_per_scope;
        Self {
            global,
            objects: ObjectRegistry::new(),
            supplicant_callbacks: ListenerList::new(),
            sta_iface_callbacks: CallbackStore::new(max),
            p2p_iface_callbacks: CallbackStore::new(max),
            sta_network_callbacks: CallbackStore::new(max),
            p2p_network_callbacks: CallbackStore::new(max),
            vendor_sta_iface_callbacks: CallbackStore::new(max),
            vendor_p2p_iface_callbacks: CallbackStore::new(max),
            vendor_enabled: config.vendor.enabled,
            dispatcher: Dispatcher::new(&config.dispatch),
            death_watch: DeathWatch::new(terminator),
            max_listeners: max,
            stats: ManagerStats::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Interfaces and Networks
    // ------------------------------------------------------------------------

    /// Create the wrapper for a native interface the core just brought up
    pub fn register_interface(&mut self, ifname: &str) -> HalResult<Arc<HalObject>> {
        let kind = self
            .global
            .interface_kind(ifname)
            .ok_or_else(|| HalError::UnknownInterface {
                ifname: ifname.to_string(),
            })?;

        let key = ObjectKey::iface(ifname);
        // one wrapper per name, whatever its role
        if let Some(existing) = self.objects.iface_kind_of(ifname) {
            return Err(HalError::already_exists(existing, &key));
        }

        let object = self.create_object(kind.iface_entity(), key)?;
        self.stats.interfaces_registered += 1;
        info!("Registered {} {}", object.kind(), ifname);

        self.notify_supplicant(&SupplicantEvent::InterfaceCreated {
            ifname: ifname.to_string(),
        });
        Ok(object)
    }

    /// Destroy an interface wrapper, its networks and all their listeners.
    ///
    /// Returns `false` if the interface was not registered.
    pub fn unregister_interface(&mut self, ifname: &str) -> HalResult<bool> {
        let Some(kind) = self.objects.iface_kind_of(ifname) else {
            debug!("Interface {} not registered, nothing to remove", ifname);
            return Ok(false);
        };

        if let Some(network_kind) = kind.network_kind() {
            let networks = self.objects.store(network_kind)?.networks_of(ifname);
            for key in &networks {
                self.destroy_object(network_kind, key);
            }
            self.stats.networks_removed += networks.len() as u64;
        }
        self.destroy_object(kind, &ObjectKey::iface(ifname));
        self.stats.interfaces_removed += 1;
        info!("Unregistered {} {}", kind, ifname);

        self.notify_supplicant(&SupplicantEvent::InterfaceRemoved {
            ifname: ifname.to_string(),
        });
        Ok(true)
    }

    /// Create the wrapper for a network added on a registered interface
    pub fn register_network(&mut self, ifname: &str, network_id: u32) -> HalResult<Arc<HalObject>> {
        let parent = self.parent_kind(ifname)?;
        let network_kind = network_kind_of(parent)?;

        let object = self.create_object(network_kind, ObjectKey::network(ifname, network_id))?;
        self.stats.networks_registered += 1;
        debug!("Registered {} {}", network_kind, object.key());

        match parent {
            EntityKind::P2pIface => {
                self.dispatch_p2p_iface(ifname, &P2pIfaceEvent::NetworkAdded { network_id });
            }
            _ => {
                self.notify_sta_iface(ifname, &StaIfaceEvent::NetworkAdded { network_id });
            }
        }
        Ok(object)
    }

    /// Destroy a network wrapper and its listeners.
    ///
    /// Returns `false` if the network was not registered.
    pub fn unregister_network(&mut self, ifname: &str, network_id: u32) -> HalResult<bool> {
        let parent = self.parent_kind(ifname)?;
        let network_kind = network_kind_of(parent)?;
        let key = ObjectKey::network(ifname, network_id);

        if !self.destroy_object(network_kind, &key) {
            debug!("Network {} not registered, nothing to remove", key);
            return Ok(false);
        }
        self.stats.networks_removed += 1;

        match parent {
            EntityKind::P2pIface => {
                self.dispatch_p2p_iface(ifname, &P2pIfaceEvent::NetworkRemoved { network_id });
            }
            _ => {
                self.notify_sta_iface(ifname, &StaIfaceEvent::NetworkRemoved { network_id });
            }
        }
        Ok(true)
    }

    pub fn get_sta_iface_object(&self, ifname: &str) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::StaIface, &ObjectKey::iface(ifname))
    }

    pub fn get_p2p_iface_object(&self, ifname: &str) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::P2pIface, &ObjectKey::iface(ifname))
    }

    pub fn get_sta_network_object(
        &self,
        ifname: &str,
        network_id: u32,
    ) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::StaNetwork, &ObjectKey::network(ifname, network_id))
    }

    pub fn get_p2p_network_object(
        &self,
        ifname: &str,
        network_id: u32,
    ) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::P2pNetwork, &ObjectKey::network(ifname, network_id))
    }

    pub fn get_vendor_sta_iface_object(&self, ifname: &str) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::VendorStaIface, &ObjectKey::iface(ifname))
    }

    pub fn get_vendor_p2p_iface_object(&self, ifname: &str) -> HalResult<Arc<HalObject>> {
        self.objects
            .lookup(EntityKind::VendorP2pIface, &ObjectKey::iface(ifname))
    }

    pub fn get_vendor_sta_network_object(
        &self,
        ifname: &str,
        network_id: u32,
    ) -> HalResult<Arc<HalObject>> {
        self.objects.lookup(
            EntityKind::VendorStaNetwork,
            &ObjectKey::network(ifname, network_id),
        )
    }

    pub fn vendor_enabled(&self) -> bool {
        self.vendor_enabled
    }

    // ------------------------------------------------------------------------
    // Callback Registration
    // ------------------------------------------------------------------------

    pub fn add_supplicant_callback(
        &mut self,
        handle: ListenerHandle<SupplicantCall>,
    ) -> HalResult<()> {
        self.supplicant_callbacks
            .add(GLOBAL_SCOPE, handle, self.max_listeners)
    }

    pub fn remove_supplicant_callback(&mut self, endpoint: EndpointId) -> HalResult<()> {
        if self.supplicant_callbacks.remove(endpoint) {
            Ok(())
        } else {
            Err(HalError::ListenerNotFound {
                endpoint,
                scope: GLOBAL_SCOPE.to_string(),
            })
        }
    }

    pub fn add_sta_iface_callback(
        &mut self,
        ifname: &str,
        handle: ListenerHandle<StaIfaceCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::iface(ifname);
        self.objects.lookup(EntityKind::StaIface, &key)?;
        self.sta_iface_callbacks.add(&key, handle)
    }

    pub fn remove_sta_iface_callback(
        &mut self,
        ifname: &str,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.sta_iface_callbacks
            .remove(&ObjectKey::iface(ifname), endpoint)
    }

    pub fn add_p2p_iface_callback(
        &mut self,
        ifname: &str,
        handle: ListenerHandle<P2pIfaceCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::iface(ifname);
        self.objects.lookup(EntityKind::P2pIface, &key)?;
        self.p2p_iface_callbacks.add(&key, handle)
    }

    pub fn remove_p2p_iface_callback(
        &mut self,
        ifname: &str,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.p2p_iface_callbacks
            .remove(&ObjectKey::iface(ifname), endpoint)
    }

    pub fn add_sta_network_callback(
        &mut self,
        ifname: &str,
        network_id: u32,
        handle: ListenerHandle<StaNetworkCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::network(ifname, network_id);
        self.objects.lookup(EntityKind::StaNetwork, &key)?;
        self.sta_network_callbacks.add(&key, handle)
    }

    pub fn remove_sta_network_callback(
        &mut self,
        ifname: &str,
        network_id: u32,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.sta_network_callbacks
            .remove(&ObjectKey::network(ifname, network_id), endpoint)
    }

    pub fn add_p2p_network_callback(
        &mut self,
        ifname: &str,
        network_id: u32,
        handle: ListenerHandle<P2pNetworkCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::network(ifname, network_id);
        self.objects.lookup(EntityKind::P2pNetwork, &key)?;
        self.p2p_network_callbacks.add(&key, handle)
    }

    pub fn remove_p2p_network_callback(
        &mut self,
        ifname: &str,
        network_id: u32,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.p2p_network_callbacks
            .remove(&ObjectKey::network(ifname, network_id), endpoint)
    }

    pub fn add_vendor_sta_iface_callback(
        &mut self,
        ifname: &str,
        handle: ListenerHandle<VendorStaIfaceCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::iface(ifname);
        self.objects.lookup(EntityKind::VendorStaIface, &key)?;
        self.vendor_sta_iface_callbacks.add(&key, handle)
    }

    pub fn remove_vendor_sta_iface_callback(
        &mut self,
        ifname: &str,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.vendor_sta_iface_callbacks
            .remove(&ObjectKey::iface(ifname), endpoint)
    }

    pub fn add_vendor_p2p_iface_callback(
        &mut self,
        ifname: &str,
        handle: ListenerHandle<VendorP2pIfaceCall>,
    ) -> HalResult<()> {
        let key = ObjectKey::iface(ifname);
        self.objects.lookup(EntityKind::VendorP2pIface, &key)?;
        self.vendor_p2p_iface_callbacks.add(&key, handle)
    }

    pub fn remove_vendor_p2p_iface_callback(
        &mut self,
        ifname: &str,
        endpoint: EndpointId,
    ) -> HalResult<()> {
        self.vendor_p2p_iface_callbacks
            .remove(&ObjectKey::iface(ifname), endpoint)
    }

    // ------------------------------------------------------------------------
    // Death Handling
    // ------------------------------------------------------------------------

    /// Treat `endpoint` as the controlling client: its death terminates the process
    pub fn watch_client(&mut self, endpoint: EndpointId) -> bool {
        self.death_watch.watch(endpoint)
    }

    /// Transport reported `endpoint` gone.
    ///
    /// A watched client triggers termination; any other endpoint is silently
    /// dropped from every scope. Returns the number of handles removed.
    pub fn on_endpoint_died(&mut self, endpoint: EndpointId) -> usize {
        if self.death_watch.is_watched(endpoint) {
            self.on_client_connection_lost();
            return 0;
        }
        let removed = self.remove_endpoint_everywhere(endpoint);
        debug!("Endpoint {} died, removed {} listener(s)", endpoint, removed);
        removed
    }

    /// Fail fast: request process termination, exactly once
    pub fn on_client_connection_lost(&mut self) -> bool {
        self.death_watch.trigger("Client died")
    }

    pub fn has_terminated(&self) -> bool {
        self.death_watch.has_fired()
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    pub fn notify_supplicant(&mut self, event: &SupplicantEvent) -> DispatchReport {
        let snapshot = self.supplicant_callbacks.snapshot();
        let report = self.dispatcher.fan_out(GLOBAL_SCOPE, event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    pub fn notify_sta_iface(&mut self, ifname: &str, event: &StaIfaceEvent) -> DispatchReport {
        let key = ObjectKey::iface(ifname);
        if !self.objects.contains(EntityKind::StaIface, &key) {
            debug!("Dropping {} for unregistered sta_iface {}", event.name(), ifname);
            return DispatchReport::default();
        }

        let snapshot = self.sta_iface_callbacks.snapshot(&key);
        let report = self.dispatcher.fan_out(ifname, event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    /// Events raised on a P2P group interface go to the owning device interface
    pub fn notify_p2p_iface(&mut self, ifname: &str, event: &P2pIfaceEvent) -> DispatchReport {
        match self.global.p2p_group_parent(ifname) {
            Some(parent) => {
                debug!("Routing {} from group {} to {}", event.name(), ifname, parent);
                self.dispatch_p2p_iface(&parent, event)
            }
            None => self.dispatch_p2p_iface(ifname, event),
        }
    }

    pub fn notify_sta_network(
        &mut self,
        ifname: &str,
        network_id: u32,
        event: &StaNetworkEvent,
    ) -> DispatchReport {
        let key = ObjectKey::network(ifname, network_id);
        if !self.objects.contains(EntityKind::StaNetwork, &key) {
            debug!("Dropping {} for unregistered sta_network {}", event.name(), key);
            return DispatchReport::default();
        }

        let snapshot = self.sta_network_callbacks.snapshot(&key);
        let report = self.dispatcher.fan_out(&key.to_string(), event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    pub fn notify_vendor_sta_iface(
        &mut self,
        ifname: &str,
        event: &VendorStaIfaceEvent,
    ) -> DispatchReport {
        let key = ObjectKey::iface(ifname);
        if !self.objects.contains(EntityKind::VendorStaIface, &key) {
            debug!("Dropping {} for unregistered vendor_sta_iface {}", event.name(), ifname);
            return DispatchReport::default();
        }

        let snapshot = self.vendor_sta_iface_callbacks.snapshot(&key);
        let report = self.dispatcher.fan_out(ifname, event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    /// Routed like `notify_p2p_iface`: group events reach the device interface
    pub fn notify_vendor_p2p_iface(
        &mut self,
        ifname: &str,
        event: &VendorP2pIfaceEvent,
    ) -> DispatchReport {
        let target = self
            .global
            .p2p_group_parent(ifname)
            .unwrap_or_else(|| ifname.to_string());
        let key = ObjectKey::iface(target.as_str());
        if !self.objects.contains(EntityKind::VendorP2pIface, &key) {
            debug!("Dropping {} for unregistered vendor_p2p_iface {}", event.name(), target);
            return DispatchReport::default();
        }

        let snapshot = self.vendor_p2p_iface_callbacks.snapshot(&key);
        let report = self.dispatcher.fan_out(&target, event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    pub fn set_debug_params(&mut self, params: DebugParams) -> HalResult<()> {
        self.global.set_debug_params(params)?;
        info!(
            "Debug params set: level={:?} timestamp={} keys={}",
            params.level, params.show_timestamp, params.show_keys
        );
        Ok(())
    }

    /// Announce termination, then destroy every wrapper, networks first.
    ///
    /// Returns the number of wrappers destroyed.
    pub fn shutdown(&mut self) -> usize {
        self.notify_supplicant(&SupplicantEvent::Terminating);

        let mut destroyed = 0;
        for kind in EntityKind::SUPPLICANT_TEARDOWN_ORDER {
            let keys = self
                .objects
                .store(kind)
                .map(ObjectStore::keys)
                .unwrap_or_default();
            for key in &keys {
                if self.destroy_object(kind, key) {
                    destroyed += 1;
                }
            }
        }
        self.supplicant_callbacks.clear();
        info!("Shut down, {} object(s) destroyed", destroyed);
        destroyed
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn stats(&self) -> &ManagerStats {
        &self.stats
    }

    pub fn supplicant_listeners(&self) -> Vec<EndpointId> {
        self.supplicant_callbacks.endpoints()
    }

    /// Listeners scoped to `key` in the store for `kind`, in fan-out order
    pub fn listeners(&self, kind: EntityKind, key: &ObjectKey) -> Vec<EndpointId> {
        match kind {
            EntityKind::StaIface => self.sta_iface_callbacks.endpoints(key),
            EntityKind::P2pIface => self.p2p_iface_callbacks.endpoints(key),
            EntityKind::StaNetwork => self.sta_network_callbacks.endpoints(key),
            EntityKind::P2pNetwork => self.p2p_network_callbacks.endpoints(key),
            EntityKind::VendorStaIface => self.vendor_sta_iface_callbacks.endpoints(key),
            EntityKind::VendorP2pIface => self.vendor_p2p_iface_callbacks.endpoints(key),
            EntityKind::VendorStaNetwork | EntityKind::AccessPoint => Vec::new(),
        }
    }

    pub fn total_listeners(&self) -> usize {
        self.supplicant_callbacks.len()
            + self.sta_iface_callbacks.total()
            + self.p2p_iface_callbacks.total()
            + self.sta_network_callbacks.total()
            + self.p2p_network_callbacks.total()
            + self.vendor_sta_iface_callbacks.total()
            + self.vendor_p2p_iface_callbacks.total()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn dispatch_p2p_iface(&mut self, ifname: &str, event: &P2pIfaceEvent) -> DispatchReport {
        let key = ObjectKey::iface(ifname);
        if !self.objects.contains(EntityKind::P2pIface, &key) {
            debug!("Dropping {} for unregistered p2p_iface {}", event.name(), ifname);
            return DispatchReport::default();
        }

        let snapshot = self.p2p_iface_callbacks.snapshot(&key);
        let report = self.dispatcher.fan_out(ifname, event, &snapshot);
        self.finish_dispatch(&report);
        report
    }

    /// Record the outcome and drop endpoints found dead during the fan-out
    fn finish_dispatch(&mut self, report: &DispatchReport) {
        self.stats.events_dispatched += 1;
        self.stats.deliveries += report.delivered as u64;
        self.stats.skipped_deliveries += report.skipped as u64;
        self.stats.failed_deliveries += report.failed as u64;

        for endpoint in &report.dead {
            let removed = self.remove_endpoint_everywhere(*endpoint);
            self.stats.listeners_pruned += removed as u64;
        }
    }

    /// Create a wrapper and, with the vendor service on, its vendor shadow
    fn create_object(&mut self, kind: EntityKind, key: ObjectKey) -> HalResult<Arc<HalObject>> {
        let object = self.objects.create(kind, key.clone())?;
        if let Some(vendor_kind) = kind.vendor_kind().filter(|_| self.vendor_enabled) {
            if let Err(e) = self.objects.create(vendor_kind, key.clone()) {
                self.objects.destroy(kind, &key);
                return Err(e);
            }
        }
        Ok(object)
    }

    /// Destroy a wrapper, its vendor shadow and their listeners; false if the
    /// wrapper was absent
    fn destroy_object(&mut self, kind: EntityKind, key: &ObjectKey) -> bool {
        if self.objects.destroy(kind, key).is_none() {
            return false;
        }

        let purged = match kind {
            EntityKind::StaIface => self.sta_iface_callbacks.purge(key),
            EntityKind::P2pIface => self.p2p_iface_callbacks.purge(key),
            EntityKind::StaNetwork => self.sta_network_callbacks.purge(key),
            EntityKind::P2pNetwork => self.p2p_network_callbacks.purge(key),
            EntityKind::VendorStaIface => self.vendor_sta_iface_callbacks.purge(key),
            EntityKind::VendorP2pIface => self.vendor_p2p_iface_callbacks.purge(key),
            EntityKind::VendorStaNetwork | EntityKind::AccessPoint => 0,
        };
        if purged > 0 {
            debug!("Purged {} listener(s) of {} {}", purged, kind, key);
        }

        if let Some(vendor_kind) = kind.vendor_kind() {
            self.destroy_object(vendor_kind, key);
        }
        true
    }

    fn remove_endpoint_everywhere(&mut self, endpoint: EndpointId) -> usize {
        let mut removed = usize::from(self.supplicant_callbacks.remove(endpoint));
        removed += self.sta_iface_callbacks.remove_endpoint(endpoint);
        removed += self.p2p_iface_callbacks.remove_endpoint(endpoint);
        removed += self.sta_network_callbacks.remove_endpoint(endpoint);
        removed += self.p2p_network_callbacks.remove_endpoint(endpoint);
        removed += self.vendor_sta_iface_callbacks.remove_endpoint(endpoint);
        removed += self.vendor_p2p_iface_callbacks.remove_endpoint(endpoint);
        removed
    }

    fn parent_kind(&self, ifname: &str) -> HalResult<EntityKind> {
        self.objects.iface_kind_of(ifname).ok_or_else(|| {
            warn!("Network operation on unregistered interface {}", ifname);
            HalError::invalid_state(format!("interface {} is not registered", ifname))
        })
    }
}

impl std::fmt::Debug for HalManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HalManager")
            .field("objects", &self.objects)
            .field("listeners", &self.total_listeners())
            .field("death_watch", &self.death_watch)
            .field("stats", &self.stats)
            .finish()
    }
}

fn network_kind_of(parent: EntityKind) -> HalResult<EntityKind> {
    parent.network_kind().ok_or_else(|| {
        HalError::invalid_state(format!("{} objects cannot own networks", parent))
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
