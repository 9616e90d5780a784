//! Version-polymorphic dispatcher
//!
//! One routine serves every contract: for each listener of a snapshot, in
//! order, pick the newest call shape its registered generation can receive and
//! invoke it. Failures are contained to the listener that produced them.

use tracing::{debug, info, trace, warn};
use wifi_hal_core::{
    CallbackContract, DeliveryError, DispatchConfig, EndpointId, ListenerHandle, VersionedEvent,
};

// ----------------------------------------------------------------------------
// Dispatch Report
// ----------------------------------------------------------------------------

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that accepted the call
    pub delivered: usize,
    /// Listeners whose generation has no shape for the event
    pub skipped: usize,
    /// Listeners whose invocation failed
    pub failed: usize,
    /// Endpoints found dead, to be removed once the fan-out is over
    pub dead: Vec<EndpointId>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }

    pub fn merge(&mut self, other: DispatchReport) {
        self.delivered += other.delivered;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.dead.extend(other.dead);
    }
}

// ----------------------------------------------------------------------------
// Dispatcher
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Dispatcher {
    prune_dead: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self { prune_dead: true }
    }
}

impl Dispatcher {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            prune_dead: config.prune_dead_listeners,
        }
    }

    /// Deliver `event` to every listener of `snapshot`, in order.
    ///
    /// The snapshot must be taken before the call; listeners that re-enter the
    /// coordinator cannot disturb the iteration.
    pub fn fan_out<E>(
        &self,
        scope: &str,
        event: &E,
        snapshot: &[ListenerHandle<E::Call>],
    ) -> DispatchReport
    where
        E: VersionedEvent,
    {
        let contract = <E::Call as CallbackContract>::NAME;
        let mut report = DispatchReport::default();

        for listener in snapshot {
            let Some((version, call)) = event.select(listener.version()) else {
                trace!(
                    "Listener {} (v{}) has no shape for {}, skipping",
                    listener.endpoint(),
                    listener.version(),
                    event.name()
                );
                report.skipped += 1;
                continue;
            };

            let method = call.method();
            match listener.invoke(call) {
                Ok(()) => {
                    trace!(
                        "Delivered {}::{} (v{}) to {} for {}",
                        contract,
                        method,
                        version,
                        listener.endpoint(),
                        scope
                    );
                    report.delivered += 1;
                }
                Err(DeliveryError::DeadObject) => {
                    info!(
                        "Listener {} for {} is dead, dropping after {}",
                        listener.endpoint(),
                        scope,
                        event.name()
                    );
                    report.failed += 1;
                    if self.prune_dead {
                        report.dead.push(listener.endpoint());
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to deliver {}::{} to {} for {}: {}",
                        contract,
                        method,
                        listener.endpoint(),
                        scope,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        debug!(
            "Dispatched {} for {}: {} delivered, {} skipped, {} failed",
            event.name(),
            scope,
            report.delivered,
            report.skipped,
            report.failed
        );
        report
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use wifi_hal_core::{ContractVersion, RemoteCallback, SupplicantCall, SupplicantEvent};

    type Journal = Arc<Mutex<Vec<(u8, &'static str)>>>;

    fn recording(tag: u8, journal: &Journal) -> ListenerHandle<SupplicantCall> {
        let journal = Arc::clone(journal);
        let remote: Arc<dyn RemoteCallback<SupplicantCall>> =
            Arc::new(move |call: SupplicantCall| -> Result<(), DeliveryError> {
                journal.lock().unwrap().push((tag, call.method()));
                Ok(())
            });
        ListenerHandle::new(EndpointId::new(), ContractVersion::V1_0, remote)
    }

    fn failing(error: DeliveryError) -> ListenerHandle<SupplicantCall> {
        let remote: Arc<dyn RemoteCallback<SupplicantCall>> =
            Arc::new(move |_: SupplicantCall| -> Result<(), DeliveryError> { Err(error.clone()) });
        ListenerHandle::new(EndpointId::new(), ContractVersion::V1_0, remote)
    }

    #[test]
    fn test_failures_do_not_stop_fan_out() {
        let journal = Journal::default();
        let dead = failing(DeliveryError::DeadObject);
        let snapshot = vec![
            recording(1, &journal),
            failing(DeliveryError::transport("timeout")),
            dead.clone(),
            recording(2, &journal),
        ];

        let report =
            Dispatcher::default().fan_out("global", &SupplicantEvent::Terminating, &snapshot);

        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.dead, vec![dead.endpoint()]);
        assert_eq!(
            *journal.lock().unwrap(),
            vec![(1, "on_terminating"), (2, "on_terminating")]
        );
    }

    #[test]
    fn test_pruning_can_be_disabled() {
        let config = DispatchConfig {
            prune_dead_listeners: false,
            ..DispatchConfig::default()
        };
        let snapshot = vec![failing(DeliveryError::DeadObject)];

        let report =
            Dispatcher::new(&config).fan_out("global", &SupplicantEvent::Terminating, &snapshot);
        assert_eq!(report.failed, 1);
        assert!(report.dead.is_empty());
    }

    #[test]
    fn test_report_merge() {
        let mut total = DispatchReport {
            delivered: 1,
            ..DispatchReport::default()
        };
        total.merge(DispatchReport {
            delivered: 2,
            skipped: 1,
            failed: 1,
            dead: vec![EndpointId::new()],
        });
        assert_eq!(total.attempted(), 4);
        assert_eq!(total.dead.len(), 1);
    }
}
