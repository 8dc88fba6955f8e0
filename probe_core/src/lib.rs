//! Core library: the network health probe and the HTTP gateway in front of it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod probe;

pub use crate::config::AppConfig;
pub use crate::error::{AppError, Result};
pub use handlers::create_routes;
pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};
pub use probe::{
    HealthStatus, HealthVerdict, NetworkHealthProbe, ProbeCommandBuilder, ProbeError,
    ProbeOutcome, ProbeRequest, ProbeRunner, SystemProbeRunner,
};

use crate::config::ProbeConfig;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

#[derive(Clone, Debug)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub probe: NetworkHealthProbe,
    pub probe_defaults: ProbeConfig,
}

impl AppState {
    pub fn new(probe: NetworkHealthProbe, probe_defaults: ProbeConfig) -> Self {
        Self {
            app_name: "Network Health Probe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            probe,
            probe_defaults,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            NetworkHealthProbe::from_config(&config.probe),
            config.probe.clone(),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let router = create_routes().layer(middleware::cors::cors_layer_from_config(&config.cors));

    middleware::logging::with_request_logging(router).with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
