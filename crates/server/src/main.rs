use std::sync::Arc;

use anyhow::Error as AnyhowError;
use db::{DBService, DbErr};
use server::{AppState, http};
use services::services::email::{EmailConfig, Notifier, SmtpMailer};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};
use utils_jwt::TokenVerifier;

const DEFAULT_DATABASE_URL: &str = "sqlite://taskflow.sqlite?mode=rwc";

#[derive(Debug, Error)]
pub enum TaskFlowError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

#[tokio::main]
async fn main() -> Result<(), TaskFlowError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},utils={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string)
        .map_err(|err| TaskFlowError::Other(err.into()))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let database_url = std::env::var("TASKFLOW_DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = DBService::new(&database_url).await?;

    let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| TaskFlowError::MissingJwtSecret)?;
    let verifier = TokenVerifier::new(&jwt_secret);

    let notifier = match EmailConfig::from_env() {
        Some(config) => match SmtpMailer::new(&config) {
            Ok(mailer) => {
                tracing::info!(host = %config.host, "Completion emails enabled");
                Notifier::new(Arc::new(mailer))
            }
            Err(err) => {
                tracing::warn!("Invalid SMTP configuration, emails disabled: {}", err);
                Notifier::disabled()
            }
        },
        None => {
            tracing::info!("EMAIL_HOST not set, completion emails disabled");
            Notifier::disabled()
        }
    };

    let state = AppState::new(db, notifier, verifier);
    let app_router = http::router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .unwrap_or(5000);
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Server running on http://{host}:{actual_port}");

    axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {err}");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
