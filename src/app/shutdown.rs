use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::state::{PhaseCell, ProcessPhase};
use super::types::ExitIntent;
use crate::store::DataStore;

/// Shutdown coordinator: the one procedure every termination trigger ends
/// in. Releases the data store, closes the listener, and produces the exit
/// code; the process exit itself stays with the caller so the sequence is
/// testable without a real process.
pub struct Coordinator {
    phase: Arc<PhaseCell>,
    store: Arc<dyn DataStore>,
    drain: CancellationToken,
    serve_task: Mutex<Option<JoinHandle<()>>>,
    grace: Duration,
}

impl Coordinator {
    pub(super) fn new(phase: Arc<PhaseCell>, store: Arc<dyn DataStore>, grace: Duration) -> Self {
        Self {
            phase,
            store,
            drain: CancellationToken::new(),
            serve_task: Mutex::new(None),
            grace,
        }
    }

    /// Token the serve loop watches for the drain request.
    pub(super) fn drain_token(&self) -> CancellationToken {
        self.drain.clone()
    }

    /// Hand over the running serve task so shutdown can await its drain.
    pub(super) async fn register_serve_task(&self, task: JoinHandle<()>) {
        *self.serve_task.lock().await = Some(task);
    }

    /// Run the shutdown sequence and return the exit code, or `None` when
    /// another trigger already claimed shutdown. Strictly ordered: store
    /// disconnect, then listener close, then return; each step is bounded
    /// by the grace period and its failure is reported, never escalated.
    pub async fn shutdown(&self, intent: ExitIntent) -> Option<i32> {
        if !self.phase.begin_shutdown() {
            debug!("Shutdown already in progress, ignoring duplicate trigger");
            return None;
        }

        info!("Beginning graceful shutdown ({:?})", intent);

        match timeout(self.grace, self.store.disconnect()).await {
            Ok(Ok(())) => info!("Data store released"),
            Ok(Err(e)) => error!("Data store disconnect failed: {}", e),
            Err(_) => error!(
                "Data store disconnect timed out after {:?}, proceeding",
                self.grace
            ),
        }

        let serve_task = self.serve_task.lock().await.take();
        if let Some(task) = serve_task {
            self.drain.cancel();
            match timeout(self.grace, task).await {
                Ok(Ok(())) => info!("Listener closed"),
                Ok(Err(e)) => error!("Serve task failed during drain: {}", e),
                Err(_) => error!(
                    "Listener drain timed out after {:?}, forcing exit",
                    self.grace
                ),
            }
        }

        self.phase
            .advance(ProcessPhase::ShuttingDown, ProcessPhase::Terminated);

        let code = intent.exit_code();
        info!("Graceful shutdown completed with exit code: {}", code);
        Some(code)
    }
}
