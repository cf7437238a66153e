use crate::error::RoostError;
use crate::server::BindFaultKind;

/// Termination triggers, sent by their event sources into the lifecycle
/// channel and consumed by the supervisor's run loop.
#[derive(Debug)]
pub enum LifecycleEvent {
    /// The listener reported a classified bind-time fault.
    BindFault(BindFaultKind),
    /// An asynchronous error escaped all local handling.
    UnhandledFault(RoostError),
    /// Operator interrupt, carrying the signal name for the log.
    Interrupt(String),
}

/// Classified reason for shutdown; fixes the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIntent {
    BindFault(BindFaultKind),
    UnhandledFault,
    OperatorInterrupt,
}

impl ExitIntent {
    /// Exit-code contract: 0 only for an operator-requested shutdown.
    /// Unclassified bind faults never become an intent; they crash the
    /// process before reaching the coordinator.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BindFault(_) | Self::UnhandledFault => 1,
            Self::OperatorInterrupt => 0,
        }
    }
}
