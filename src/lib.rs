pub mod app;
pub mod config;
pub mod error;
pub mod listen;
pub mod server;
pub mod store;

pub use app::{Coordinator, ExitIntent, FaultHandle, LifecycleEvent, ProcessPhase, Supervisor};
pub use config::RoostConfig;
pub use error::{Result, RoostError};
pub use listen::{resolve, ListenTarget};
pub use server::{BindFaultKind, BoundListener};
pub use store::{Bootstrap, DataStore, NoopBootstrap, TcpStore};
