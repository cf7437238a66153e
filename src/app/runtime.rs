use tokio::signal;
use tracing::{error, info};

use super::supervisor::Supervisor;
use super::types::{ExitIntent, LifecycleEvent};
use crate::error::{Result, RoostError};

impl Supervisor {
    /// Run one full process lifecycle: startup, then block on the first
    /// termination trigger and drive the shutdown sequence.
    ///
    /// Returns the process exit code for the caller to pass to
    /// `std::process::exit`. Unrecoverable faults are returned as errors
    /// for the caller's fatal path instead.
    pub async fn run(mut self) -> Result<i32> {
        let mut events = self
            .events
            .take()
            .ok_or_else(|| RoostError::system("Lifecycle event receiver already taken"))?;

        self.start().await?;

        // Single consumer: the first trigger decides the exit intent, and
        // the phase guard keeps any stragglers from re-running shutdown.
        let Some(event) = events.recv().await else {
            return Err(RoostError::system(
                "Lifecycle event channel closed unexpectedly",
            ));
        };

        let intent = match event {
            LifecycleEvent::Interrupt(signal) => {
                info!("Received {} signal, shutting down", signal);
                ExitIntent::OperatorInterrupt
            }
            LifecycleEvent::UnhandledFault(err) => {
                error!("Unhandled fault: {}", err);
                ExitIntent::UnhandledFault
            }
            LifecycleEvent::BindFault(kind) => ExitIntent::BindFault(kind),
        };

        let code = intent.exit_code();
        Ok(self.coordinator.shutdown(intent).await.unwrap_or(code))
    }

    /// Register the operator-interrupt triggers. Called before the
    /// listener bind so there is no window without a handler.
    pub(super) fn register_signal_triggers(&self) {
        // SIGINT (Ctrl+C) - cross-platform
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                let _ = tx
                    .send(LifecycleEvent::Interrupt("SIGINT".to_string()))
                    .await;
            }
        });

        // SIGTERM (systemd stop) - Unix only
        #[cfg(unix)]
        {
            let tx = self.event_tx.clone();
            tokio::spawn(async move {
                if let Some(()) = signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await
                {
                    let _ = tx
                        .send(LifecycleEvent::Interrupt("SIGTERM".to_string()))
                        .await;
                }
            });
        }
    }
}
