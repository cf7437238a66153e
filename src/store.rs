use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Result, RoostError};

/// Lifecycle contract for the external data store.
///
/// The supervisor connects at most once during startup and disconnects at
/// most once during shutdown; implementations only need to be safe for one
/// call per lifecycle phase.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
}

/// Gateway holding a TCP connection to the store's wire address. The
/// protocol spoken over the connection is out of scope here.
pub struct TcpStore {
    addr: String,
    conn: Mutex<Option<TcpStream>>,
}

impl TcpStore {
    pub fn new<S: Into<String>>(addr: S) -> Self {
        Self {
            addr: addr.into(),
            conn: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DataStore for TcpStore {
    async fn connect(&self) -> Result<()> {
        let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            RoostError::store(format!("connect to {} failed: {}", self.addr, e))
        })?;
        debug!("Data store connection established to {}", self.addr);
        *self.conn.lock().await = Some(stream);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        // Dropping the stream closes the socket.
        if self.conn.lock().await.take().is_some() {
            debug!("Data store connection to {} closed", self.addr);
        }
        Ok(())
    }
}

/// One-time data initialization run after the store connect. Fire and
/// forget: the supervisor spawns it, logs a failure and never blocks the
/// listener bind on it.
#[async_trait]
pub trait Bootstrap: Send + Sync {
    async fn run(&self) -> Result<()>;
}

/// Bootstrap used when the service has nothing to seed.
pub struct NoopBootstrap;

#[async_trait]
impl Bootstrap for NoopBootstrap {
    async fn run(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tcp_store_connect_failure_is_a_store_error() {
        // Port 1 on localhost is refused in practice.
        let store = TcpStore::new("127.0.0.1:1");
        let err = store.connect().await.unwrap_err();
        assert!(matches!(err, RoostError::Store { .. }));
    }

    #[tokio::test]
    async fn tcp_store_disconnect_without_connect_is_ok() {
        let store = TcpStore::new("127.0.0.1:1");
        assert!(store.disconnect().await.is_ok());
    }

    #[tokio::test]
    async fn tcp_store_round_trip() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let store = TcpStore::new(addr);
        store.connect().await.unwrap();
        store.disconnect().await.unwrap();
        // Second disconnect is a no-op, not an error.
        store.disconnect().await.unwrap();
    }
}
