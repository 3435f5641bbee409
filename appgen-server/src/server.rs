use crate::{
    api::{create_middleware_stack, handlers},
    config::ServerConfig,
    services::DeploymentService,
};
use appgen_observability::ServiceHealth;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub deployment_service: Arc<DeploymentService>,
}

pub struct ApiServer {
    app: Router,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(
        deployment_service: Arc<DeploymentService>,
        config: ServerConfig,
    ) -> Self {
        let state = AppState { deployment_service };
        let app = build_router(state, &config);
        Self { app, config }
    }

    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind((
            self.config.host.as_str(),
            self.config.port,
        ))
        .await?;
        let addr = listener.local_addr()?;

        info!("🚀 AppGen running on {}", addr);
        info!("Health check available at: http://{}/health", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Consume and return the underlying Axum Router so callers can serve it
    /// themselves (e.g., in tests).
    pub fn into_router(self) -> Router {
        self.app
    }
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/templates", get(handlers::list_templates))
        .route("/api/deploy", post(handlers::deploy))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_payload_bytes))
        .layer(create_middleware_stack())
        .with_state(state)
}

async fn health_check() -> Json<ServiceHealth> {
    Json(ServiceHealth::healthy(
        "appgen-server",
        env!("CARGO_PKG_VERSION"),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
