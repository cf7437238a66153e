use axum::{routing::get, Router};
use std::io;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::listen::ListenTarget;

/// Bind faults with a friendly, non-crashing handling path.
///
/// The set is deliberately closed: permission and address-conflict faults
/// get a readable log line and a controlled exit code, everything else the
/// classifier returns `None` for and the caller re-raises as unrecoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindFaultKind {
    /// EACCES: insufficient privilege for the requested target.
    PermissionDenied,
    /// EADDRINUSE: the target is already bound by another process.
    AddrInUse,
}

impl BindFaultKind {
    pub fn classify(err: &io::Error) -> Option<Self> {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Some(Self::PermissionDenied),
            io::ErrorKind::AddrInUse => Some(Self::AddrInUse),
            // No friendly path for anything else.
            _ => None,
        }
    }
}

/// A bound listener ready to serve.
#[derive(Debug)]
pub enum BoundListener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl BoundListener {
    /// Human-readable bound address, for the readiness log and
    /// introspection only.
    pub fn describe(&self) -> String {
        match self {
            Self::Tcp(listener) => listener
                .local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "<tcp>".to_string()),
            #[cfg(unix)]
            Self::Unix(listener) => listener
                .local_addr()
                .ok()
                .and_then(|addr| addr.as_pathname().map(|p| p.display().to_string()))
                .unwrap_or_else(|| "<unix>".to_string()),
        }
    }
}

/// Bind a listener to the resolved target. Invalid targets and ports above
/// 65535 fail here with an unclassified error.
pub async fn bind(host: &str, target: &ListenTarget) -> io::Result<BoundListener> {
    match target {
        ListenTarget::Port(port) => {
            let port = u16::try_from(*port).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("listen port {} out of range", port),
                )
            })?;
            let listener = TcpListener::bind((host, port)).await?;
            Ok(BoundListener::Tcp(listener))
        }
        ListenTarget::Pipe(path) => {
            #[cfg(unix)]
            {
                let listener = UnixListener::bind(path)?;
                Ok(BoundListener::Unix(listener))
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "socket path targets require a unix host",
                ))
            }
        }
        ListenTarget::Invalid => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "invalid listen target",
        )),
    }
}

/// Router collaborator. The real route handlers live with the application
/// modules; the lifecycle only needs something servable.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

/// Serve until the drain token is cancelled, then let in-flight requests
/// finish per axum's graceful shutdown.
pub async fn serve(
    listener: BoundListener,
    app: Router,
    drain: CancellationToken,
) -> io::Result<()> {
    match listener {
        BoundListener::Tcp(listener) => {
            axum::serve(listener, app)
                .with_graceful_shutdown(drain.cancelled_owned())
                .await
        }
        #[cfg(unix)]
        BoundListener::Unix(listener) => {
            axum::serve(listener, app)
                .with_graceful_shutdown(drain.cancelled_owned())
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listen;

    #[test]
    fn classify_recognizes_the_two_friendly_kinds() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "eacces");
        let in_use = io::Error::new(io::ErrorKind::AddrInUse, "eaddrinuse");
        let other = io::Error::new(io::ErrorKind::InvalidInput, "bad target");

        assert_eq!(
            BindFaultKind::classify(&denied),
            Some(BindFaultKind::PermissionDenied)
        );
        assert_eq!(
            BindFaultKind::classify(&in_use),
            Some(BindFaultKind::AddrInUse)
        );
        assert_eq!(BindFaultKind::classify(&other), None);
    }

    #[tokio::test]
    async fn bind_ephemeral_port_succeeds() {
        let listener = bind("127.0.0.1", &listen::resolve("0")).await.unwrap();
        assert!(listener.describe().starts_with("127.0.0.1:"));
    }

    #[tokio::test]
    async fn bind_invalid_target_is_unclassified() {
        let err = bind("127.0.0.1", &ListenTarget::Invalid).await.unwrap_err();
        assert_eq!(BindFaultKind::classify(&err), None);
    }

    #[tokio::test]
    async fn bind_out_of_range_port_is_unclassified() {
        let err = bind("127.0.0.1", &ListenTarget::Port(99999))
            .await
            .unwrap_err();
        assert_eq!(BindFaultKind::classify(&err), None);
    }

    #[tokio::test]
    async fn bind_conflicting_port_classifies_addr_in_use() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();
        let err = bind("127.0.0.1", &ListenTarget::Port(port as u64))
            .await
            .unwrap_err();
        assert_eq!(BindFaultKind::classify(&err), Some(BindFaultKind::AddrInUse));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn bind_socket_path_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roost.sock").display().to_string();
        let listener = bind("127.0.0.1", &listen::resolve(&path)).await.unwrap();
        assert_eq!(listener.describe(), path);
    }
}
