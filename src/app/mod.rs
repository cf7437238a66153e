mod runtime;
mod shutdown;
mod startup;
mod state;
mod supervisor;
mod types;


pub use shutdown::Coordinator;
pub use state::{PhaseCell, ProcessPhase};
pub use supervisor::{FaultHandle, Supervisor};
pub use types::{ExitIntent, LifecycleEvent};
