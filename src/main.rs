//! Service entry point: wires config, adapters, and handlers, then serves.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use study_intake::adapters::email::{ConsoleMailer, ResendMailer};
use study_intake::adapters::http::{app_router, ChatHandlers};
use study_intake::adapters::memory::{
    InMemoryIdentityRepository, InMemorySessionRepository, InMemoryVerificationStore,
};
use study_intake::application::handlers::{ProcessMessageHandler, ResendCodeHandler};
use study_intake::config::AppConfig;
use study_intake::domain::conversation::ConversationEngine;
use study_intake::ports::Mailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let sessions = Arc::new(InMemorySessionRepository::new());
    let identities = Arc::new(InMemoryIdentityRepository::new());
    let codes = Arc::new(InMemoryVerificationStore::new(
        config.verification.code_ttl_minutes,
    ));

    let mailer: Arc<dyn Mailer> = if config.email.has_delivery_channel() {
        Arc::new(ResendMailer::new(&config.email))
    } else {
        tracing::warn!("no Resend API key configured; verification codes go to the log");
        Arc::new(ConsoleMailer::new())
    };

    let engine = ConversationEngine::new(config.verification.courses_path.clone());

    let process_handler = Arc::new(ProcessMessageHandler::new(
        sessions.clone(),
        identities.clone(),
        codes.clone(),
        mailer.clone(),
        engine,
        config.verification.code_ttl_minutes,
    ));
    let resend_handler = Arc::new(ResendCodeHandler::new(
        sessions,
        identities,
        codes,
        mailer,
        config.verification.code_ttl_minutes,
    ));

    let router = app_router(
        ChatHandlers::new(process_handler, resend_handler),
        &config.server,
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "study-intake listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
