use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::state::ProcessPhase;
use super::supervisor::Supervisor;
use super::types::LifecycleEvent;
use crate::error::{Result, RoostError};
use crate::listen;
use crate::server::{self, BindFaultKind};

impl Supervisor {
    /// Run the startup sequence: data store connect, one-time bootstrap,
    /// trigger registration, listener bind, readiness.
    ///
    /// Only unrecoverable faults are returned as errors; a classified bind
    /// fault becomes a lifecycle event for the run loop, and a data store
    /// connect failure is tolerated outright.
    pub(super) async fn start(&mut self) -> Result<()> {
        info!("Starting roost lifecycle");

        // A store that is down at boot does not keep the service from
        // listening; the failure is reported and startup continues.
        let connect_timeout = Duration::from_secs(self.config.store.connect_timeout_secs);
        match timeout(connect_timeout, self.store.connect()).await {
            Ok(Ok(())) => info!("Data store connected"),
            Ok(Err(e)) => warn!("Data store connection failed, continuing startup: {}", e),
            Err(_) => warn!(
                "Data store connection timed out after {:?}, continuing startup",
                connect_timeout
            ),
        }

        // One-time bootstrap, fire and forget. Its outcome never reaches
        // the lifecycle.
        let bootstrap = Arc::clone(&self.bootstrap);
        tokio::spawn(async move {
            if let Err(e) = bootstrap.run().await {
                warn!("Bootstrap failed: {}", e);
            }
        });

        let app = server::router();

        // Triggers are registered before the bind so no window exists
        // between bind and trigger registration.
        self.register_signal_triggers();

        let target = listen::resolve(&self.config.listen.target);
        info!("Binding listener to {}", target);

        match server::bind(&self.config.listen.host, &target).await {
            Ok(listener) => {
                self.bound = Some(listener.describe());

                let drain = self.coordinator.drain_token();
                let fault = self.fault_handle();
                let serve_task = tokio::spawn(async move {
                    if let Err(e) = server::serve(listener, app, drain).await {
                        fault
                            .report(RoostError::listen(format!("server error: {}", e)))
                            .await;
                    }
                });
                self.coordinator.register_serve_task(serve_task).await;

                self.phase
                    .advance(ProcessPhase::Starting, ProcessPhase::Listening);
                info!(
                    "Roost listening on {}",
                    self.bound.as_deref().unwrap_or("<unknown>")
                );
            }
            Err(err) => match BindFaultKind::classify(&err) {
                Some(kind) => {
                    match kind {
                        BindFaultKind::PermissionDenied => {
                            error!("Insufficient privilege to bind {}: {}", target, err);
                        }
                        BindFaultKind::AddrInUse => {
                            error!("{} is already in use: {}", target, err);
                        }
                    }
                    // Classified faults take the friendly path through the
                    // shutdown coordinator.
                    let _ = self.event_tx.send(LifecycleEvent::BindFault(kind)).await;
                }
                // Anything else is re-raised to the fatal path untouched.
                None => return Err(RoostError::UnrecoverableBind(err)),
            },
        }

        Ok(())
    }
}
