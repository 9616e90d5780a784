//! Callback registry
//!
//! Listener handles are kept in insertion order, which is also fan-out order.
//! Removing a listener never reorders the ones that remain.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::debug;
use wifi_hal_core::{
    CallbackContract, EndpointId, HalError, HalResult, ListenerHandle, ObjectKey,
};

// Most scopes hold one framework listener and maybe a vendor one.
type Listeners<C> = SmallVec<[ListenerHandle<C>; 2]>;

// ----------------------------------------------------------------------------
// Listener List
// ----------------------------------------------------------------------------

/// Ordered, duplicate-free listeners for one scope
#[derive(Debug)]
pub struct ListenerList<C> {
    listeners: Listeners<C>,
}

impl<C> Default for ListenerList<C> {
    fn default() -> Self {
        Self {
            listeners: SmallVec::new(),
        }
    }
}

impl<C: CallbackContract> ListenerList<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handle`; `scope` only labels errors
    pub fn add(&mut self, scope: &str, handle: ListenerHandle<C>, max: usize) -> HalResult<()> {
        if !C::supports(handle.version()) {
            return Err(HalError::invalid_argument(format!(
                "{} callbacks have no version {}",
                C::NAME,
                handle.version()
            )));
        }
        if self.contains(handle.endpoint()) {
            return Err(HalError::AlreadyRegistered {
                endpoint: handle.endpoint(),
                scope: scope.to_string(),
            });
        }
        if self.listeners.len() >= max {
            return Err(HalError::ListenerLimit {
                scope: scope.to_string(),
                max,
            });
        }

        debug!(
            "Added {} v{} listener {} for {}",
            C::NAME,
            handle.version(),
            handle.endpoint(),
            scope
        );
        self.listeners.push(handle);
        Ok(())
    }
}

impl<C> ListenerList<C> {
    /// Remove the listener for `endpoint`, keeping the others in order
    pub fn remove(&mut self, endpoint: EndpointId) -> bool {
        match self.position(endpoint) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, endpoint: EndpointId) -> bool {
        self.position(endpoint).is_some()
    }

    /// Copy of the current listeners, taken before a fan-out starts
    pub fn snapshot(&self) -> Vec<ListenerHandle<C>> {
        self.listeners.to_vec()
    }

    pub fn endpoints(&self) -> Vec<EndpointId> {
        self.listeners.iter().map(|handle| handle.endpoint()).collect()
    }

    pub fn clear(&mut self) -> usize {
        let count = self.listeners.len();
        self.listeners.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn position(&self, endpoint: EndpointId) -> Option<usize> {
        self.listeners
            .iter()
            .position(|handle| handle.endpoint() == endpoint)
    }
}

// ----------------------------------------------------------------------------
// Callback Store
// ----------------------------------------------------------------------------

/// Listener lists for one contract, keyed by the identity they are scoped to
#[derive(Debug)]
pub struct CallbackStore<C> {
    lists: BTreeMap<ObjectKey, ListenerList<C>>,
    max_per_scope: usize,
}

impl<C: CallbackContract> CallbackStore<C> {
    pub fn new(max_per_scope: usize) -> Self {
        Self {
            lists: BTreeMap::new(),
            max_per_scope,
        }
    }

    pub fn add(&mut self, key: &ObjectKey, handle: ListenerHandle<C>) -> HalResult<()> {
        let max = self.max_per_scope;
        self.lists
            .entry(key.clone())
            .or_default()
            .add(&scope_label::<C>(key), handle, max)
    }

    pub fn remove(&mut self, key: &ObjectKey, endpoint: EndpointId) -> HalResult<()> {
        let removed = match self.lists.get_mut(key) {
            Some(list) => {
                let removed = list.remove(endpoint);
                if list.is_empty() {
                    self.lists.remove(key);
                }
                removed
            }
            None => false,
        };

        if removed {
            Ok(())
        } else {
            Err(HalError::ListenerNotFound {
                endpoint,
                scope: scope_label::<C>(key),
            })
        }
    }
}

impl<C> CallbackStore<C> {
    /// Drop every listener scoped to `key`
    pub fn purge(&mut self, key: &ObjectKey) -> usize {
        self.lists.remove(key).map(|list| list.len()).unwrap_or(0)
    }

    /// Drop every listener scoped to a network of the interface `ifname`
    pub fn purge_networks_of(&mut self, ifname: &str) -> usize {
        let keys: Vec<ObjectKey> = self
            .lists
            .keys()
            .filter(|key| key.is_network_of(ifname))
            .cloned()
            .collect();
        keys.iter().map(|key| self.purge(key)).sum()
    }

    /// Drop `endpoint` from every scope
    pub fn remove_endpoint(&mut self, endpoint: EndpointId) -> usize {
        let mut removed = 0;
        self.lists.retain(|_, list| {
            if list.remove(endpoint) {
                removed += 1;
            }
            !list.is_empty()
        });
        removed
    }

    pub fn snapshot(&self, key: &ObjectKey) -> Vec<ListenerHandle<C>> {
        self.lists
            .get(key)
            .map(ListenerList::snapshot)
            .unwrap_or_default()
    }

    pub fn endpoints(&self, key: &ObjectKey) -> Vec<EndpointId> {
        self.lists
            .get(key)
            .map(ListenerList::endpoints)
            .unwrap_or_default()
    }

    pub fn len(&self, key: &ObjectKey) -> usize {
        self.lists.get(key).map(ListenerList::len).unwrap_or(0)
    }

    /// Listeners across every scope
    pub fn total(&self) -> usize {
        self.lists.values().map(ListenerList::len).sum()
    }

    pub fn clear(&mut self) -> usize {
        let total = self.total();
        self.lists.clear();
        total
    }
}

fn scope_label<C: CallbackContract>(key: &ObjectKey) -> String {
    format!("{} {}", C::NAME, key)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wifi_hal_core::{
        ContractVersion, DeliveryError, RemoteCallback, StaIfaceCall, StaNetworkCall,
    };

    fn handle<C: 'static>(version: ContractVersion) -> ListenerHandle<C> {
        let remote: Arc<dyn RemoteCallback<C>> =
            Arc::new(|_: C| -> Result<(), DeliveryError> { Ok(()) });
        ListenerHandle::new(EndpointId::new(), version, remote)
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut list = ListenerList::<StaIfaceCall>::new();
        let (a, b, c) = (
            handle(ContractVersion::V1_4),
            handle(ContractVersion::V1_0),
            handle(ContractVersion::V1_2),
        );
        for h in [a.clone(), b.clone(), c.clone()] {
            list.add("wlan0", h, 8).unwrap();
        }

        assert!(list.remove(b.endpoint()));
        assert_eq!(list.endpoints(), vec![a.endpoint(), c.endpoint()]);
        assert!(!list.remove(b.endpoint()));
    }

    #[test]
    fn test_duplicate_and_limit_rejected() {
        let mut list = ListenerList::<StaIfaceCall>::new();
        let first = handle(ContractVersion::V1_0);
        list.add("wlan0", first.clone(), 2).unwrap();

        assert!(matches!(
            list.add("wlan0", first, 2),
            Err(HalError::AlreadyRegistered { .. })
        ));
        list.add("wlan0", handle(ContractVersion::V1_1), 2).unwrap();
        assert!(matches!(
            list.add("wlan0", handle(ContractVersion::V1_1), 2),
            Err(HalError::ListenerLimit { max: 2, .. })
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut list = ListenerList::<StaNetworkCall>::new();
        let err = list
            .add("wlan0_1", handle(ContractVersion::V1_2), 8)
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidArgument { .. }));
        assert!(list.is_empty());
    }

    #[test]
    fn test_store_purges_networks_of_interface() {
        let mut store = CallbackStore::<StaNetworkCall>::new(8);
        let keep = ObjectKey::network("wlan1", 0);
        for key in [ObjectKey::network("wlan0", 0), ObjectKey::network("wlan0", 4), keep.clone()] {
            store.add(&key, handle(ContractVersion::V1_0)).unwrap();
        }

        assert_eq!(store.purge_networks_of("wlan0"), 2);
        assert_eq!(store.total(), 1);
        assert_eq!(store.len(&keep), 1);
    }

    #[test]
    fn test_store_remove_reports_missing_listener() {
        let mut store = CallbackStore::<StaIfaceCall>::new(8);
        let key = ObjectKey::iface("wlan0");
        let h = handle(ContractVersion::V1_3);
        store.add(&key, h.clone()).unwrap();

        store.remove(&key, h.endpoint()).unwrap();
        assert!(matches!(
            store.remove(&key, h.endpoint()),
            Err(HalError::ListenerNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_endpoint_everywhere() {
        let mut store = CallbackStore::<StaIfaceCall>::new(8);
        let shared = handle(ContractVersion::V1_0);
        let other = handle(ContractVersion::V1_0);
        store.add(&ObjectKey::iface("wlan0"), shared.clone()).unwrap();
        store.add(&ObjectKey::iface("wlan1"), shared.clone()).unwrap();
        store.add(&ObjectKey::iface("wlan1"), other.clone()).unwrap();

        assert_eq!(store.remove_endpoint(shared.endpoint()), 2);
        assert_eq!(store.endpoints(&ObjectKey::iface("wlan1")), vec![other.endpoint()]);
        assert_eq!(store.len(&ObjectKey::iface("wlan0")), 0);
    }
}
