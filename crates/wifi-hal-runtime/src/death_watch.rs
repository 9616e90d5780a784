//! Death-watch for controlling clients
//!
//! Losing a controlling client is an unrecoverable loss of control authority:
//! the watch asks the process to terminate and does nothing else. Registries
//! are left untouched; teardown belongs to process exit.

use std::collections::BTreeSet;

use tracing::{error, warn};
use wifi_hal_core::{EndpointId, Terminator};

pub struct DeathWatch<'g> {
    terminator: &'g dyn Terminator,
    watched: BTreeSet<EndpointId>,
    fired: bool,
}

impl<'g> DeathWatch<'g> {
    pub fn new(terminator: &'g dyn Terminator) -> Self {
        Self {
            terminator,
            watched: BTreeSet::new(),
            fired: false,
        }
    }

    /// Start watching a controlling client's endpoint
    pub fn watch(&mut self, endpoint: EndpointId) -> bool {
        self.watched.insert(endpoint)
    }

    /// Stop watching an endpoint the client released on its own
    pub fn unwatch(&mut self, endpoint: EndpointId) -> bool {
        self.watched.remove(&endpoint)
    }

    pub fn is_watched(&self, endpoint: EndpointId) -> bool {
        self.watched.contains(&endpoint)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Invoke the termination hook; only the first call has any effect
    pub fn trigger(&mut self, reason: &str) -> bool {
        if self.fired {
            warn!("Termination already requested, ignoring: {}", reason);
            return false;
        }
        self.fired = true;
        error!("{}. Terminating...", reason);
        self.terminator.terminate(reason);
        true
    }
}

impl std::fmt::Debug for DeathWatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeathWatch")
            .field("watched", &self.watched)
            .field("fired", &self.fired)
            .finish()
    }
}
