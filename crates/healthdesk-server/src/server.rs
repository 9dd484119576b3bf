//! Server startup.

use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use tokio::net::TcpListener;

pub struct HealthdeskServer {
    state: AppState,
}

impl HealthdeskServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn bind_addr(&self) -> &str {
        &self.state.config.server.bind
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.bind_addr().to_string();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        tracing::info!(
            address = %addr,
            users_file = %self.state.config.auth.users_file.display(),
            program = %self.state.config.scripts.program,
            "healthdesk listening"
        );

        let app = routes::create_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("healthdesk stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
