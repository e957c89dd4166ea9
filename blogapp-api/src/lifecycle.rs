//! Starting and stopping the HTTP server.

use crate::server::{ServerState, app};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
    #[error("Server task did not finish: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A server accepting connections in a background task.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// The bound address. Differs from the requested one when port 0 was asked for.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

pub async fn run_server(
    state: ServerState,
    address: SocketAddr,
) -> Result<RunningServer, LifecycleError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(LifecycleError::TcpBind)?;
    let local_addr = listener.local_addr().map_err(LifecycleError::TcpBind)?;

    let shutdown = CancellationToken::new();
    let serve = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let task = tokio::spawn(async move { serve.await });

    info!(%local_addr, "Server listening");
    Ok(RunningServer {
        local_addr,
        shutdown,
        task,
    })
}

/// Stops accepting connections and waits for in-flight requests to finish.
pub async fn close_server(server: RunningServer) -> Result<(), LifecycleError> {
    info!(local_addr = %server.local_addr, "Closing server");

    server.shutdown.cancel();
    server.task.await?.map_err(LifecycleError::TcpServe)?;

    Ok(())
}
