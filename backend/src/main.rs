//! Service entry-point: loads settings, selects the user store and runs the
//! HTTP server.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_service::domain::ports::UserRepository;
use user_service::inbound::http::health::HealthState;
use user_service::outbound::memory::InMemoryUserRepository;
use user_service::outbound::persistence::{MongoConnection, MongoUserRepository};
use user_service::settings::ServiceSettings;

/// Connect the configured user store.
async fn build_repository(settings: &ServiceSettings) -> io::Result<Arc<dyn UserRepository>> {
    if settings.in_memory {
        warn!("serving from the in-memory user store; data is lost on exit");
        return Ok(Arc::new(InMemoryUserRepository::new()));
    }

    let connection = MongoConnection::connect(&settings.mongo_config())
        .await
        .map_err(io::Error::other)?;
    Ok(Arc::new(MongoUserRepository::new(&connection)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let list_limit = settings.list_limit().map_err(io::Error::other)?;
    let repository = build_repository(&settings).await?;

    let config = ServerConfig::new(bind_addr, repository).with_list_limit(list_limit);
    info!(bind_addr = %config.bind_addr(), list_limit, "starting user service");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

#[cfg(test)]
mod tests;
