//! Hostapd access point coordinator
//!
//! Tracks one wrapper per access point and the member instances of bridged
//! (dual-band) access points, fans hostapd events out to registered callbacks
//! and applies the same fail-fast death-watch as the supplicant side: every
//! registered callback is a controlling client.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};
use wifi_hal_core::wire::{DebugLevel, Ieee80211ReasonCode};
use wifi_hal_core::{
    AccessPointBackend, AccessPointParams, EndpointId, EntityKind, HalConfig, HalError,
    HalResult, HostapdCall, HostapdEvent, ListenerHandle, MacAddr, ObjectKey, Terminator,
};

use crate::death_watch::DeathWatch;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::managers::{HalObject, ListenerList, ObjectStore};

const HOSTAPD_SCOPE: &str = "hostapd";

pub struct HostapdManager<'g> {
    backend: &'g dyn AccessPointBackend,
    access_points: ObjectStore,
    /// Bridge name to the member interfaces running its instances
    bridges: BTreeMap<String, Vec<String>>,
    callbacks: ListenerList<HostapdCall>,
    dispatcher: Dispatcher,
    death_watch: DeathWatch<'g>,
    max_listeners: usize,
}

impl<'g> HostapdManager<'g> {
    pub fn new(
        backend: &'g dyn AccessPointBackend,
        terminator: &'g dyn Terminator,
        config: &HalConfig,
    ) -> Self {
        Self {
            backend,
            access_points: ObjectStore::new(EntityKind::AccessPoint),
            bridges: BTreeMap::new(),
            callbacks: ListenerList::new(),
            dispatcher: Dispatcher::new(&config.dispatch),
            death_watch: DeathWatch::new(terminator),
            max_listeners: config.dispatch.max_listeners_per_scope,
        }
    }

    // ------------------------------------------------------------------------
    // Access Points
    // ------------------------------------------------------------------------

    /// Bring up an access point and register its wrapper.
    ///
    /// A bridged request starts one instance per bridge member; if any of them
    /// fails, the instances already started are stopped again. An interface
    /// runs at most one instance, whether standalone or as a bridge member.
    pub fn add_access_point(&mut self, params: &AccessPointParams) -> HalResult<Arc<HalObject>> {
        params.validate()?;
        let key = ObjectKey::iface(params.ifname.as_str());
        self.ensure_idle(&params.ifname)?;

        if params.is_bridged() {
            let mut members = self.backend.interfaces_in_bridge(&params.ifname)?;
            if members.len() < params.channels.len() {
                return Err(HalError::invalid_state(format!(
                    "bridge {} has {} member(s) for {} channel(s)",
                    params.ifname,
                    members.len(),
                    params.channels.len()
                )));
            }
            members.truncate(params.channels.len());
            for member in &members {
                self.ensure_idle(member)?;
            }
            self.start_bridged(params, &members)?;
            self.bridges.insert(params.ifname.clone(), members);
        } else {
            self.backend.start_access_point(params)?;
        }

        let object = self.access_points.create(key)?;
        info!("Access point {} added", params.ifname);
        Ok(object)
    }

    /// Stop an access point; `false` if it was not registered.
    ///
    /// Every bridge member is asked to stop. Members that refuse stay on record
    /// with the access point, so a retry only stops what is still running.
    pub fn remove_access_point(&mut self, ifname: &str) -> HalResult<bool> {
        let key = ObjectKey::iface(ifname);
        if !self.access_points.contains(&key) {
            debug!("Access point {} not registered, nothing to remove", ifname);
            return Ok(false);
        }

        if let Some(members) = self.bridges.get(ifname) {
            let mut running = Vec::new();
            let mut first_error = None;
            for member in members {
                if let Err(e) = self.backend.stop_access_point(member) {
                    warn!("Failed to stop {} on bridge {}: {}", member, ifname, e);
                    running.push(member.clone());
                    first_error.get_or_insert(e);
                }
            }
            if let Some(e) = first_error {
                self.bridges.insert(ifname.to_string(), running);
                return Err(e);
            }
            self.bridges.remove(ifname);
        } else {
            self.backend.stop_access_point(ifname)?;
        }

        self.access_points.destroy(&key);
        info!("Access point {} removed", ifname);
        Ok(true)
    }

    pub fn get_access_point(&self, ifname: &str) -> HalResult<Arc<HalObject>> {
        self.access_points.lookup(&ObjectKey::iface(ifname))
    }

    /// Member interfaces of a bridged access point
    pub fn bridge_members(&self, bridge: &str) -> Option<&[String]> {
        self.bridges.get(bridge).map(Vec::as_slice)
    }

    /// Bridge whose instances include `ifname`
    pub fn bridge_of(&self, ifname: &str) -> Option<&str> {
        self.bridges
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == ifname))
            .map(|(bridge, _)| bridge.as_str())
    }

    pub fn force_client_disconnect(
        &mut self,
        ifname: &str,
        client: MacAddr,
        reason: Ieee80211ReasonCode,
    ) -> HalResult<()> {
        self.get_access_point(ifname)?;
        match self.bridges.get(ifname) {
            Some(members) => {
                for member in members {
                    self.backend.force_client_disconnect(member, client, reason)?;
                }
                Ok(())
            }
            None => self.backend.force_client_disconnect(ifname, client, reason),
        }
    }

    pub fn set_debug_params(&mut self, level: DebugLevel) -> HalResult<()> {
        self.backend.set_debug_level(level)?;
        info!("Hostapd debug level set to {:?}", level);
        Ok(())
    }

    /// Stop every access point, then ask the process to terminate
    pub fn terminate(&mut self) {
        for key in self.access_points.keys() {
            if let Err(e) = self.remove_access_point(key.iface_name()) {
                warn!("Failed to stop {} during terminate: {}", key, e);
            }
        }
        self.death_watch.trigger("Terminate requested");
    }

    // ------------------------------------------------------------------------
    // Callbacks
    // ------------------------------------------------------------------------

    /// Register a controlling client's callback; its death terminates the process
    pub fn register_callback(&mut self, handle: ListenerHandle<HostapdCall>) -> HalResult<()> {
        let endpoint = handle.endpoint();
        self.callbacks.add(HOSTAPD_SCOPE, handle, self.max_listeners)?;
        self.death_watch.watch(endpoint);
        Ok(())
    }

    /// Drop a callback the client released; its later death is routine
    pub fn remove_callback(&mut self, endpoint: EndpointId) -> HalResult<()> {
        if self.callbacks.remove(endpoint) {
            self.death_watch.unwatch(endpoint);
            Ok(())
        } else {
            Err(HalError::ListenerNotFound {
                endpoint,
                scope: HOSTAPD_SCOPE.to_string(),
            })
        }
    }

    pub fn on_endpoint_died(&mut self, endpoint: EndpointId) {
        if self.death_watch.is_watched(endpoint) {
            self.on_client_connection_lost();
        } else {
            self.callbacks.remove(endpoint);
        }
    }

    pub fn on_client_connection_lost(&mut self) -> bool {
        self.death_watch.trigger("Client died")
    }

    pub fn has_terminated(&self) -> bool {
        self.death_watch.has_fired()
    }

    pub fn listeners(&self) -> Vec<EndpointId> {
        self.callbacks.endpoints()
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    pub fn notify(&mut self, event: &HostapdEvent) -> DispatchReport {
        let snapshot = self.callbacks.snapshot();
        let report = self.dispatcher.fan_out(HOSTAPD_SCOPE, event, &snapshot);
        for endpoint in &report.dead {
            self.callbacks.remove(*endpoint);
        }
        report
    }

    /// An instance failed. For a bridged access point the failure is reported
    /// against the bridge and the instance leaves the member list.
    pub fn notify_instance_failure(&mut self, instance: &str) -> DispatchReport {
        let bridge = self
            .bridges
            .iter_mut()
            .find(|(_, members)| members.iter().any(|m| m == instance));

        let ifname = match bridge {
            Some((bridge, members)) => {
                members.retain(|m| m != instance);
                warn!(
                    "Instance {} of {} failed, {} instance(s) left",
                    instance,
                    bridge,
                    members.len()
                );
                bridge.clone()
            }
            None => instance.to_string(),
        };

        self.notify(&HostapdEvent::Failure {
            ifname,
            instance_name: instance.to_string(),
        })
    }

    fn ensure_idle(&self, ifname: &str) -> HalResult<()> {
        let key = ObjectKey::iface(ifname);
        if self.access_points.contains(&key) {
            return Err(HalError::already_exists(EntityKind::AccessPoint, &key));
        }
        if let Some(bridge) = self.bridge_of(ifname) {
            warn!("{} already runs an instance of {}", ifname, bridge);
            return Err(HalError::already_exists(EntityKind::AccessPoint, &key));
        }
        Ok(())
    }

    fn start_bridged(&self, params: &AccessPointParams, members: &[String]) -> HalResult<()> {
        let mut started: Vec<&str> = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let instance = params.instance(member, index).ok_or_else(|| {
                HalError::invalid_argument(format!("no channel parameters for {}", member))
            })?;

            if let Err(e) = self.backend.start_access_point(&instance) {
                warn!("Failed to start {} on bridge {}: {}", member, params.ifname, e);
                for running in started {
                    if let Err(stop_err) = self.backend.stop_access_point(running) {
                        warn!("Failed to stop {}: {}", running, stop_err);
                    }
                }
                return Err(e);
            }
            started.push(member.as_str());
        }
        Ok(())
    }
}

impl std::fmt::Debug for HostapdManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostapdManager")
            .field("access_points", &self.access_points)
            .field("bridges", &self.bridges)
            .field("listeners", &self.callbacks.len())
            .field("death_watch", &self.death_watch)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Mutex;
    use wifi_hal_core::wire::{ApBand, EncryptionType};
    use wifi_hal_core::{ChannelParams, ContractVersion, DeliveryError, HwModeParams, NetworkParams};

    #[derive(Default)]
    struct FakeBackend {
        members: Vec<String>,
        fail_on: Option<String>,
        fail_stop_on: RefCell<Option<String>>,
        journal: RefCell<Vec<String>>,
    }

    impl AccessPointBackend for FakeBackend {
        fn start_access_point(&self, params: &AccessPointParams) -> HalResult<()> {
            if self.fail_on.as_deref() == Some(params.ifname.as_str()) {
                return Err(HalError::backend(format!("{} refused", params.ifname)));
            }
            self.journal.borrow_mut().push(format!("start {}", params.ifname));
            Ok(())
        }

        fn stop_access_point(&self, ifname: &str) -> HalResult<()> {
            if self.fail_stop_on.borrow().as_deref() == Some(ifname) {
                return Err(HalError::backend(format!("{} busy", ifname)));
            }
            self.journal.borrow_mut().push(format!("stop {}", ifname));
            Ok(())
        }

        fn interfaces_in_bridge(&self, _bridge: &str) -> HalResult<Vec<String>> {
            Ok(self.members.clone())
        }

        fn force_client_disconnect(
            &self,
            ifname: &str,
            _client: MacAddr,
            _reason: Ieee80211ReasonCode,
        ) -> HalResult<()> {
            self.journal.borrow_mut().push(format!("disconnect {}", ifname));
            Ok(())
        }

        fn set_debug_level(&self, level: DebugLevel) -> HalResult<()> {
            self.journal.borrow_mut().push(format!("debug {:?}", level));
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingTerminator {
        count: Cell<usize>,
    }

    impl Terminator for CountingTerminator {
        fn terminate(&self, _reason: &str) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn backend_with_bridge() -> FakeBackend {
        FakeBackend {
            members: vec!["wlan1".into(), "wlan2".into()],
            ..FakeBackend::default()
        }
    }

    fn params(ifname: &str, channels: usize) -> AccessPointParams {
        AccessPointParams {
            ifname: ifname.into(),
            hw_mode: HwModeParams::default(),
            channels: (0..channels)
                .map(|i| ChannelParams {
                    band_mask: if i == 0 {
                        ApBand::Band2Ghz.code()
                    } else {
                        ApBand::Band5Ghz.code()
                    },
                    channel: 6,
                    enable_acs: false,
                    acs_exclude_dfs: false,
                })
                .collect(),
            network: NetworkParams {
                ssid: b"TestAP".to_vec(),
                is_hidden: false,
                encryption: EncryptionType::Wpa2,
                passphrase: "password123".into(),
            },
        }
    }

    fn recorder(
        version: ContractVersion,
    ) -> (ListenerHandle<HostapdCall>, Arc<Mutex<Vec<HostapdCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let remote = move |call: HostapdCall| -> Result<(), DeliveryError> {
            sink.lock().unwrap().push(call);
            Ok(())
        };
        (
            ListenerHandle::new(EndpointId::new(), version, Arc::new(remote)),
            calls,
        )
    }

    #[test]
    fn test_single_access_point_lifecycle() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        let object = hostapd.add_access_point(&params("wlan0", 1)).unwrap();
        assert!(object.is_valid());
        assert!(matches!(
            hostapd.add_access_point(&params("wlan0", 1)),
            Err(HalError::AlreadyExists { .. })
        ));

        assert!(hostapd.remove_access_point("wlan0").unwrap());
        assert!(!object.is_valid());
        assert!(!hostapd.remove_access_point("wlan0").unwrap());
        assert_eq!(*backend.journal.borrow(), vec!["start wlan0", "stop wlan0"]);
    }

    #[test]
    fn test_bridged_access_point_starts_every_member() {
        let backend = backend_with_bridge();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        hostapd.add_access_point(&params("ap_br_wlan1", 2)).unwrap();
        assert_eq!(
            hostapd.bridge_members("ap_br_wlan1"),
            Some(&["wlan1".to_string(), "wlan2".to_string()][..])
        );

        hostapd
            .force_client_disconnect(
                "ap_br_wlan1",
                MacAddr::new([2, 0, 0, 0, 0, 1]),
                Ieee80211ReasonCode::Unspecified,
            )
            .unwrap();
        assert_eq!(
            *backend.journal.borrow(),
            vec![
                "start wlan1",
                "start wlan2",
                "disconnect wlan1",
                "disconnect wlan2"
            ]
        );
    }

    #[test]
    fn test_bridged_failure_rolls_back() {
        let backend = FakeBackend {
            fail_on: Some("wlan2".into()),
            ..backend_with_bridge()
        };
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        assert!(hostapd.add_access_point(&params("ap_br_wlan1", 2)).is_err());
        assert!(hostapd.get_access_point("ap_br_wlan1").is_err());
        assert!(hostapd.bridge_members("ap_br_wlan1").is_none());
        assert_eq!(*backend.journal.borrow(), vec!["start wlan1", "stop wlan1"]);
    }

    #[test]
    fn test_bridge_keeps_only_started_members() {
        let backend = FakeBackend {
            members: vec!["wlan1".into(), "wlan2".into(), "wlan3".into()],
            ..FakeBackend::default()
        };
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        hostapd.add_access_point(&params("ap_br_wlan1", 2)).unwrap();
        assert_eq!(
            hostapd.bridge_members("ap_br_wlan1"),
            Some(&["wlan1".to_string(), "wlan2".to_string()][..])
        );
        assert_eq!(hostapd.bridge_of("wlan3"), None);

        // wlan3 never ran, so it is free for a standalone access point
        hostapd.add_access_point(&params("wlan3", 1)).unwrap();
        hostapd.remove_access_point("ap_br_wlan1").unwrap();
        assert_eq!(
            *backend.journal.borrow(),
            vec!["start wlan1", "start wlan2", "start wlan3", "stop wlan1", "stop wlan2"]
        );
    }

    #[test]
    fn test_interface_runs_one_instance() {
        let backend = backend_with_bridge();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());
        hostapd.add_access_point(&params("ap_br_wlan1", 2)).unwrap();

        assert_eq!(hostapd.bridge_of("wlan1"), Some("ap_br_wlan1"));
        assert!(matches!(
            hostapd.add_access_point(&params("wlan1", 1)),
            Err(HalError::AlreadyExists { .. })
        ));
        assert!(hostapd.get_access_point("wlan1").is_err());
        assert_eq!(*backend.journal.borrow(), vec!["start wlan1", "start wlan2"]);

        // A second bridge over the same members is refused before any start
        assert!(matches!(
            hostapd.add_access_point(&params("ap_br_wlan2", 2)),
            Err(HalError::AlreadyExists { .. })
        ));
        assert!(hostapd.bridge_members("ap_br_wlan2").is_none());
        assert_eq!(backend.journal.borrow().len(), 2);
    }

    #[test]
    fn test_refused_stop_keeps_member_for_retry() {
        let backend = backend_with_bridge();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());
        hostapd.add_access_point(&params("ap_br_wlan1", 2)).unwrap();

        *backend.fail_stop_on.borrow_mut() = Some("wlan1".into());
        assert!(matches!(
            hostapd.remove_access_point("ap_br_wlan1"),
            Err(HalError::Backend { .. })
        ));
        assert!(hostapd.get_access_point("ap_br_wlan1").is_ok());
        assert_eq!(
            hostapd.bridge_members("ap_br_wlan1"),
            Some(&["wlan1".to_string()][..])
        );

        *backend.fail_stop_on.borrow_mut() = None;
        assert!(hostapd.remove_access_point("ap_br_wlan1").unwrap());
        assert!(hostapd.get_access_point("ap_br_wlan1").is_err());
        assert!(hostapd.bridge_members("ap_br_wlan1").is_none());
        assert_eq!(
            *backend.journal.borrow(),
            vec!["start wlan1", "start wlan2", "stop wlan2", "stop wlan1"]
        );
    }

    #[test]
    fn test_invalid_params_never_reach_backend() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        let mut bad = params("wlan0", 1);
        bad.network.ssid.clear();
        assert!(matches!(
            hostapd.add_access_point(&bad),
            Err(HalError::InvalidArgument { .. })
        ));
        assert!(backend.journal.borrow().is_empty());
    }

    #[test]
    fn test_instance_failure_reports_against_bridge() {
        let backend = backend_with_bridge();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());
        hostapd.add_access_point(&params("ap_br_wlan1", 2)).unwrap();

        let (legacy, legacy_calls) = recorder(ContractVersion::V1_1);
        let (current, current_calls) = recorder(ContractVersion::V1_3);
        hostapd.register_callback(legacy).unwrap();
        hostapd.register_callback(current).unwrap();

        let report = hostapd.notify_instance_failure("wlan2");
        assert_eq!(report.delivered, 2);
        assert_eq!(hostapd.bridge_members("ap_br_wlan1"), Some(&["wlan1".to_string()][..]));

        assert_eq!(
            *legacy_calls.lock().unwrap(),
            vec![HostapdCall::Failure {
                ifname: "ap_br_wlan1".into()
            }]
        );
        assert_eq!(
            *current_calls.lock().unwrap(),
            vec![HostapdCall::FailureWithInstance {
                ifname: "ap_br_wlan1".into(),
                instance_name: "wlan2".into(),
            }]
        );
    }

    #[test]
    fn test_callback_death_terminates_once() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());
        hostapd.add_access_point(&params("wlan0", 1)).unwrap();

        let (handle, _) = recorder(ContractVersion::V1_3);
        let endpoint = handle.endpoint();
        hostapd.register_callback(handle).unwrap();

        hostapd.on_endpoint_died(endpoint);
        hostapd.on_endpoint_died(endpoint);
        assert!(hostapd.has_terminated());
        assert_eq!(terminator.count.get(), 1);

        // Teardown is left to process exit
        assert!(hostapd.get_access_point("wlan0").is_ok());
        assert_eq!(hostapd.listeners(), vec![endpoint]);
    }

    #[test]
    fn test_remove_callback() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        let (handle, _) = recorder(ContractVersion::V1_1);
        let endpoint = handle.endpoint();
        hostapd.register_callback(handle).unwrap();
        hostapd.remove_callback(endpoint).unwrap();
        assert!(matches!(
            hostapd.remove_callback(endpoint),
            Err(HalError::ListenerNotFound { .. })
        ));

        // A released callback dying later is not a lost controller
        hostapd.on_endpoint_died(endpoint);
        assert!(!hostapd.has_terminated());
        assert_eq!(terminator.count.get(), 0);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());

        let (handle, _) = recorder(ContractVersion::V1_0);
        assert!(matches!(
            hostapd.register_callback(handle),
            Err(HalError::InvalidArgument { .. })
        ));
        assert!(hostapd.listeners().is_empty());
    }

    #[test]
    fn test_terminate_stops_everything() {
        let backend = FakeBackend::default();
        let terminator = CountingTerminator::default();
        let mut hostapd = HostapdManager::new(&backend, &terminator, &HalConfig::testing());
        hostapd.add_access_point(&params("wlan0", 1)).unwrap();
        hostapd.set_debug_params(DebugLevel::Debug).unwrap();

        hostapd.terminate();
        assert!(hostapd.get_access_point("wlan0").is_err());
        assert_eq!(terminator.count.get(), 1);
        assert_eq!(
            *backend.journal.borrow(),
            vec!["start wlan0", "debug Debug", "stop wlan0"]
        );
    }
}
