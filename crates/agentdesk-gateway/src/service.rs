use crate::config::Config;
use crate::routes::{router, AppState};
use agentdesk_persistence::Storage;
use agentdesk_provider::{backend_for, AgentDispatcher};
use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// Gateway service - main orchestrator
pub struct GatewayService {
    config: Config,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the gateway service until Ctrl+C
    pub async fn run(self) -> Result<()> {
        agentdesk_logging::init_logging(&self.config.logging.level, self.config.logging.format)?;
        info!("Starting AgentDesk Gateway Service");

        let storage = Storage::open(&self.config.storage).await?;
        info!("Record store initialized ({:?})", self.config.storage.backend);

        let provider = self.config.provider();
        let client = reqwest::Client::new();
        let dispatcher = AgentDispatcher::new(backend_for(&provider, client))
            .with_generation(self.config.generation);

        // Start anyway; agent requests answer 500 until a key is set
        if let Err(e) = dispatcher.backend().ensure_configured() {
            warn!("{} provider unusable: {}", provider.name(), e);
        }

        let app = router(AppState::new(storage, dispatcher), self.config.server.cors);

        let listener = TcpListener::bind(&self.config.server.bind).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Gateway service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, shutting down gracefully...");
}
