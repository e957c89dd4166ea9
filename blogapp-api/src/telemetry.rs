use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "blogapp_api=debug,\
    blogapp_db=debug,\
    tower_http=debug,axum::rejection=trace,sqlx=warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
