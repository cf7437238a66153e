use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::shutdown::Coordinator;
use super::state::{PhaseCell, ProcessPhase};
use super::types::LifecycleEvent;
use crate::config::RoostConfig;
use crate::error::RoostError;
use crate::store::{Bootstrap, DataStore};

/// Lifecycle channel capacity. Triggers are rare and only the first one
/// decides the exit intent.
const EVENT_CAPACITY: usize = 8;

/// Cloneable handle collaborators use to report errors that escaped all
/// local handling. Each report becomes an unhandled-fault trigger.
#[derive(Clone)]
pub struct FaultHandle {
    tx: mpsc::Sender<LifecycleEvent>,
}

impl FaultHandle {
    pub async fn report(&self, error: RoostError) {
        // If the channel is gone the process is already shutting down.
        let _ = self.tx.send(LifecycleEvent::UnhandledFault(error)).await;
    }
}

/// Lifecycle context for one process invocation: owns the collaborators,
/// the process phase and the termination-event channel. Constructed at
/// process entry and torn down exactly once by the shutdown coordinator.
pub struct Supervisor {
    pub(super) config: RoostConfig,
    pub(super) store: Arc<dyn DataStore>,
    pub(super) bootstrap: Arc<dyn Bootstrap>,
    pub(super) phase: Arc<PhaseCell>,
    pub(super) coordinator: Arc<Coordinator>,
    pub(super) event_tx: mpsc::Sender<LifecycleEvent>,
    pub(super) events: Option<mpsc::Receiver<LifecycleEvent>>,
    pub(super) bound: Option<String>,
}

impl Supervisor {
    pub fn new(
        config: RoostConfig,
        store: Arc<dyn DataStore>,
        bootstrap: Arc<dyn Bootstrap>,
    ) -> Self {
        let (event_tx, events) = mpsc::channel(EVENT_CAPACITY);
        let phase = Arc::new(PhaseCell::new());
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&phase),
            Arc::clone(&store),
            Duration::from_secs(config.shutdown.grace_secs),
        ));

        Self {
            config,
            store,
            bootstrap,
            phase,
            coordinator,
            event_tx,
            events: Some(events),
            bound: None,
        }
    }

    pub fn fault_handle(&self) -> FaultHandle {
        FaultHandle {
            tx: self.event_tx.clone(),
        }
    }

    pub fn coordinator(&self) -> Arc<Coordinator> {
        Arc::clone(&self.coordinator)
    }

    pub fn phase(&self) -> ProcessPhase {
        self.phase.current()
    }

    /// Bound listen address, available once the listener is up. For
    /// introspection and logs only.
    pub fn bound_addr(&self) -> Option<&str> {
        self.bound.as_deref()
    }
}
