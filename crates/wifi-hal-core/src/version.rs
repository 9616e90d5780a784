//! Callback contract versions and version-polymorphic events
//!
//! Every callback contract exists in several generations. A listener registers
//! under one generation and implicitly supports every older one it extends. An
//! event may have a call shape at several generations; delivery picks the newest
//! shape at or below the listener's generation:
//!
//! ```text
//! probe(registered) -> probe(previous) -> ... -> probe(V1_0) -> skip
//! ```

use core::fmt;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Contract Version
// ----------------------------------------------------------------------------

/// Generation of a callback contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
}

impl ContractVersion {
    /// All generations, oldest first
    pub const ALL: [ContractVersion; 5] = [
        ContractVersion::V1_0,
        ContractVersion::V1_1,
        ContractVersion::V1_2,
        ContractVersion::V1_3,
        ContractVersion::V1_4,
    ];

    pub const LATEST: ContractVersion = ContractVersion::V1_4;

    /// The generation this one extends, if any
    pub fn previous(&self) -> Option<ContractVersion> {
        match self {
            ContractVersion::V1_0 => None,
            ContractVersion::V1_1 => Some(ContractVersion::V1_0),
            ContractVersion::V1_2 => Some(ContractVersion::V1_1),
            ContractVersion::V1_3 => Some(ContractVersion::V1_2),
            ContractVersion::V1_4 => Some(ContractVersion::V1_3),
        }
    }

    /// This generation followed by every generation it extends, newest first
    pub fn probe_order(self) -> impl Iterator<Item = ContractVersion> {
        core::iter::successors(Some(self), |version| version.previous())
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContractVersion::V1_0 => "1.0",
            ContractVersion::V1_1 => "1.1",
            ContractVersion::V1_2 => "1.2",
            ContractVersion::V1_3 => "1.3",
            ContractVersion::V1_4 => "1.4",
        };
        f.write_str(label)
    }
}

// ----------------------------------------------------------------------------
// Contracts and Events
// ----------------------------------------------------------------------------

/// A callback contract: the set of call shapes one listener kind can receive
pub trait CallbackContract {
    /// Contract name used in logs
    const NAME: &'static str;

    /// Generations a listener may register under, oldest first
    const VERSIONS: &'static [ContractVersion];

    fn supports(version: ContractVersion) -> bool {
        Self::VERSIONS.contains(&version)
    }

    /// Name of the concrete call, for logs
    fn method(&self) -> &'static str;
}

/// A logical event with one call shape per generation that can represent it
pub trait VersionedEvent {
    type Call: CallbackContract;

    /// Event name used in logs
    fn name(&self) -> &'static str;

    /// The call shape declared at exactly `version`, if this event has one there
    fn shape_at(&self, version: ContractVersion) -> Option<Self::Call>;

    /// Most specific call shape for a listener registered under `registered`
    fn select(&self, registered: ContractVersion) -> Option<(ContractVersion, Self::Call)> {
        registered
            .probe_order()
            .find_map(|version| self.shape_at(version).map(|call| (version, call)))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_order_walks_down_to_base() {
        let order: Vec<_> = ContractVersion::V1_3.probe_order().collect();
        assert_eq!(
            order,
            vec![
                ContractVersion::V1_3,
                ContractVersion::V1_2,
                ContractVersion::V1_1,
                ContractVersion::V1_0
            ]
        );
        assert_eq!(ContractVersion::V1_0.probe_order().count(), 1);
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(ContractVersion::V1_0 < ContractVersion::V1_4);
        assert_eq!(ContractVersion::LATEST, *ContractVersion::ALL.last().unwrap());
        assert_eq!(ContractVersion::V1_2.to_string(), "1.2");
    }

    #[derive(Debug, PartialEq)]
    enum ProbeCall {
        Base,
        Extended(u8),
    }

    impl CallbackContract for ProbeCall {
        const NAME: &'static str = "probe";
        const VERSIONS: &'static [ContractVersion] =
            &[ContractVersion::V1_0, ContractVersion::V1_2];

        fn method(&self) -> &'static str {
            match self {
                ProbeCall::Base => "base",
                ProbeCall::Extended(_) => "extended",
            }
        }
    }

    struct ProbeEvent {
        value: u8,
        base_shape: bool,
    }

    impl VersionedEvent for ProbeEvent {
        type Call = ProbeCall;

        fn name(&self) -> &'static str {
            "probe_event"
        }

        fn shape_at(&self, version: ContractVersion) -> Option<ProbeCall> {
            match version {
                ContractVersion::V1_2 => Some(ProbeCall::Extended(self.value)),
                ContractVersion::V1_0 if self.base_shape => Some(ProbeCall::Base),
                _ => None,
            }
        }
    }

    #[test]
    fn test_select_prefers_newest_applicable_shape() {
        let event = ProbeEvent {
            value: 7,
            base_shape: true,
        };

        assert_eq!(
            event.select(ContractVersion::V1_4),
            Some((ContractVersion::V1_2, ProbeCall::Extended(7)))
        );
        assert_eq!(
            event.select(ContractVersion::V1_1),
            Some((ContractVersion::V1_0, ProbeCall::Base))
        );
    }

    #[test]
    fn test_select_skips_when_no_shape_fits() {
        let event = ProbeEvent {
            value: 1,
            base_shape: false,
        };

        assert_eq!(event.select(ContractVersion::V1_0), None);
        assert!(event.select(ContractVersion::V1_3).is_some());
        assert!(ProbeCall::supports(ContractVersion::V1_2));
        assert!(!ProbeCall::supports(ContractVersion::V1_1));
    }
}
