//! Intake Agent HTTP server.

use intake_agent::adapters::http::{app_router, ConversationAppState};
use intake_agent::bootstrap::{build_intake_service, init_tracing};
use intake_agent::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let intake = config.load_intake()?;
    let service = build_intake_service(&intake, &config.ai)?;
    tracing::info!(
        persona = %intake.persona.name,
        fields = intake.fields.fields().len(),
        provider = ?intake.llm.provider,
        model = %intake.llm.model,
        "intake agent configured"
    );

    let app = app_router(ConversationAppState::new(service), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "intake agent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
