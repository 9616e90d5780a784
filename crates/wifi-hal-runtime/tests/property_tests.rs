//! Property-based tests for registry and fan-out invariants


use proptest::prelude::*;
use test_utils::{recording_listener, CountingTerminator, FakeGlobal, Journal};
use wifi_hal_core::{ContractVersion, IfaceKind, StaIfaceCall, StaIfaceEvent};
use wifi_hal_runtime::{EntityKind, HalConfig, HalManager, ObjectKey};

/// Operations the supplicant core may issue against one interface name
#[derive(Debug, Clone)]
enum Op {
    Register,
    Unregister,
    AddNetwork(u32),
    RemoveNetwork(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Register),
        Just(Op::Unregister),
        (0u32..4).prop_map(Op::AddNetwork),
        (0u32..4).prop_map(Op::RemoveNetwork),
    ]
}

fn arb_version() -> impl Strategy<Value = ContractVersion> {
    prop::sample::select(ContractVersion::ALL.to_vec())
}

proptest! {
    /// Property: delivery order is registration order, minus removed listeners
    #[test]
    fn fan_out_preserves_registration_order(
        count in 1usize..12,
        removed in prop::collection::btree_set(0usize..12, 0..6),
    ) {
        let global = FakeGlobal::with_defaults();
        let terminator = CountingTerminator::new();
        let mut manager = HalManager::new(&global, &terminator, &HalConfig::testing());
        let journal = Journal::new();
        manager.register_interface("wlan0").unwrap();

        let mut endpoints = Vec::new();
        for index in 0..count {
            let listener = recording_listener::<StaIfaceCall>(
                &journal,
                &index.to_string(),
                ContractVersion::V1_4,
            );
            endpoints.push(listener.endpoint());
            manager.add_sta_iface_callback("wlan0", listener).unwrap();
        }
        for index in removed.iter().filter(|i| **i < count) {
            manager.remove_sta_iface_callback("wlan0", endpoints[*index]).unwrap();
        }

        manager.notify_sta_iface("wlan0", &StaIfaceEvent::WpsEventSuccess);

        let expected: Vec<String> = (0..count)
            .filter(|i| !removed.contains(i))
            .map(|i| i.to_string())
            .collect();
        prop_assert_eq!(journal.listeners(), expected);
    }

    /// Property: every listener gets exactly one call or is skipped, never both
    #[test]
    fn each_listener_served_at_most_once(
        versions in prop::collection::vec(arb_version(), 1..10),
    ) {
        let global = FakeGlobal::with_defaults();
        let terminator = CountingTerminator::new();
        let mut manager = HalManager::new(&global, &terminator, &HalConfig::testing());
        let journal = Journal::new();
        manager.register_interface("wlan0").unwrap();

        for (index, version) in versions.iter().enumerate() {
            manager
                .add_sta_iface_callback(
                    "wlan0",
                    recording_listener(&journal, &index.to_string(), *version),
                )
                .unwrap();
        }

        let report = manager.notify_sta_iface(
            "wlan0",
            &StaIfaceEvent::PmkCacheAdded {
                expiration_time_secs: 3600,
                serialized_entry: vec![1, 2, 3],
            },
        );

        let eligible = versions.iter().filter(|v| **v >= ContractVersion::V1_3).count();
        prop_assert_eq!(report.delivered, eligible);
        prop_assert_eq!(report.skipped, versions.len() - eligible);
        prop_assert_eq!(journal.entries().len(), eligible);
    }

    /// Property: after any operation sequence, every registered network has a
    /// registered parent, and nothing is registered under a removed interface
    #[test]
    fn networks_never_outlive_their_interface(ops in prop::collection::vec(arb_op(), 0..40)) {
        let global = FakeGlobal::new();
        global.add_interface("wlan0", IfaceKind::Sta);
        let terminator = CountingTerminator::new();
        let mut manager = HalManager::new(&global, &terminator, &HalConfig::testing());

        for op in ops {
            // Errors are expected for out-of-order operations; the invariant is
            // checked on the resulting state
            let _ = match op {
                Op::Register => manager.register_interface("wlan0").map(|_| true),
                Op::Unregister => manager.unregister_interface("wlan0"),
                Op::AddNetwork(id) => manager.register_network("wlan0", id).map(|_| true),
                Op::RemoveNetwork(id) => manager.unregister_network("wlan0", id),
            };

            let iface_live = manager.get_sta_iface_object("wlan0").is_ok();
            let networks = manager
                .objects()
                .store(EntityKind::StaNetwork)
                .unwrap()
                .networks_of("wlan0");
            prop_assert!(iface_live || networks.is_empty());
            for key in &networks {
                prop_assert_eq!(key.parent(), ObjectKey::iface("wlan0"));
            }
        }
    }
}
