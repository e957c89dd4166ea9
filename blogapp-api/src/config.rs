use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
}

/// Which [`PostStore`](blogapp_db::PostStore) backs the server.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Env {
    #[serde(default = "default_server_address")]
    pub server_address: IpAddr,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default)]
    pub store: StoreKind,
}

fn default_server_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_server_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "postgres://localhost/blog-app".to_owned()
}

fn default_database_max_connections() -> u32 {
    5
}

impl Env {
    #[must_use]
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.server_address, self.server_port)
    }
}

/// Loads `.env` if there is one, then reads [`Env`] from the process environment.
pub fn get_env() -> Result<Env, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .env file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
    use crate::config::{Env, StoreKind};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    fn env_from(vars: &[(&str, &str)]) -> Result<Env, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned())),
        )
    }

    #[test]
    fn defaults() {
        let env = env_from(&[]).unwrap();

        assert_eq!(
            env.socket_address(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080)
        );
        assert_eq!(env.database_url, "postgres://localhost/blog-app");
        assert_eq!(env.database_max_connections, 5);
        assert_eq!(env.store, StoreKind::Postgres);
    }

    #[test]
    fn overrides() {
        let env = env_from(&[
            ("SERVER_ADDRESS", "0.0.0.0"),
            ("SERVER_PORT", "3000"),
            ("DATABASE_URL", "postgres://db/blog"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("STORE", "memory"),
        ])
        .unwrap();

        assert_eq!(env.server_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(env.server_port, 3000);
        assert_eq!(env.database_url, "postgres://db/blog");
        assert_eq!(env.database_max_connections, 20);
        assert_eq!(env.store, StoreKind::Memory);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(env_from(&[("SERVER_PORT", "not a port")]).is_err());
        assert!(env_from(&[("STORE", "mongodb")]).is_err());
    }
}
