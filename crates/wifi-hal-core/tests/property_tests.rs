//! Property-based tests for identity keys and version selection
//!
//! These tests verify the ordering invariants registries rely on and the
//! probe-newest-first rule used when picking a call shape for a listener.

use proptest::prelude::*;
use wifi_hal_core::{
    events::StateChange,
    wire::{EapErrorCode, SupplicantState},
    CallbackContract, ContractVersion, MacAddr, ObjectKey, StaIfaceCall, StaIfaceEvent,
    VersionedEvent,
};

/// Generate arbitrary interface names
fn arb_ifname() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"(wlan|p2p-dev-wlan|ap_br_wlan)[0-9]{1,2}").unwrap()
}

fn arb_key() -> impl Strategy<Value = ObjectKey> {
    (arb_ifname(), prop::option::of(0u32..64)).prop_map(|(ifname, id)| match id {
        Some(id) => ObjectKey::network(ifname, id),
        None => ObjectKey::iface(ifname),
    })
}

fn arb_version() -> impl Strategy<Value = ContractVersion> {
    prop::sample::select(ContractVersion::ALL.to_vec())
}

fn arb_state() -> impl Strategy<Value = SupplicantState> {
    prop::sample::select(SupplicantState::ALL.to_vec())
}

proptest! {
    /// Property: a network key always sorts after its parent interface key
    #[test]
    fn network_sorts_after_parent(ifname in arb_ifname(), id in 0u32..1024) {
        let parent = ObjectKey::iface(ifname.clone());
        let network = ObjectKey::network(ifname, id);

        prop_assert!(parent < network);
        prop_assert_eq!(network.parent(), parent);
    }

    /// Property: keys are equal iff their display forms and structure agree
    #[test]
    fn key_equality_is_structural(a in arb_key(), b in arb_key()) {
        let same_parts = a.iface_name() == b.iface_name() && a.network_id() == b.network_id();
        prop_assert_eq!(a == b, same_parts);
    }

    /// Property: the probe order starts at the registered version and strictly descends
    #[test]
    fn probe_order_descends(version in arb_version()) {
        let order: Vec<_> = version.probe_order().collect();

        prop_assert_eq!(order[0], version);
        prop_assert_eq!(*order.last().unwrap(), ContractVersion::V1_0);
        prop_assert!(order.windows(2).all(|pair| pair[0] > pair[1]));
    }

    /// Property: a selected shape is never newer than the listener's version
    #[test]
    fn selection_never_exceeds_registration(
        version in arb_version(),
        state in arb_state(),
        error_code in prop::sample::select(vec![0u32, 7, 1026, 1031, 16384, 70000]),
    ) {
        let events = [
            StaIfaceEvent::StateChanged(StateChange {
                new_state: state,
                bssid: MacAddr::ZERO,
                network_id: 0,
                ssid: Vec::new(),
                fils_hlp_sent: false,
            }),
            StaIfaceEvent::EapFailure { error_code },
            StaIfaceEvent::NetworkNotFound { ssid: b"x".to_vec() },
        ];

        for event in &events {
            if let Some((selected, _)) = event.select(version) {
                prop_assert!(selected <= version);
                prop_assert!(StaIfaceCall::supports(selected));
            }
        }
    }

    /// Property: 1.1 listeners get the enumerated EAP code exactly when one exists
    #[test]
    fn eap_code_enumeration(error_code in any::<u32>()) {
        let call = StaIfaceEvent::EapFailure { error_code }
            .select(ContractVersion::V1_1)
            .map(|(_, call)| call);

        match EapErrorCode::from_code(error_code) {
            Some(code) => {
                prop_assert_eq!(call, Some(StaIfaceCall::EapFailureWithErrorCode { code }))
            }
            None => prop_assert_eq!(call, Some(StaIfaceCall::EapFailure)),
        }
    }
}
