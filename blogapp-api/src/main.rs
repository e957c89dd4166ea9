use blogapp_api::{
    config::{self, ConfigError, Env, StoreKind},
    lifecycle::{LifecycleError, close_server, run_server},
    server::ServerState,
    telemetry::install_tracing,
};
use blogapp_db::{DbClient, DbError, MemoryStore, PostStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Error opening the post store: {0}")]
    Database(#[from] DbError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("Error waiting for the shutdown signal: {0}")]
    Signal(std::io::Error),
}

async fn open_store(env: &Env) -> Result<Arc<dyn PostStore>, InitError> {
    match env.store {
        StoreKind::Postgres => {
            let client = DbClient::connect(&env.database_url, env.database_max_connections).await?;
            client.migrate().await?;
            Ok(Arc::new(client))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory store, posts will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = config::get_env()?;

    let store = open_store(&env).await?;
    let server = run_server(ServerState::new(store), env.socket_address()).await?;

    tokio::signal::ctrl_c().await.map_err(InitError::Signal)?;
    info!("Shutdown signal received");

    close_server(server).await?;
    Ok(())
}
