//! Service entry point: configuration, persistence, seeding, HTTP server.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::example_data::{SeedSettings, seed_on_startup};
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::server::{ServerConfig, build_survey_ports, create_server};

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(err) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {err}"
                )))
            }
        }
    }
}

fn bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    raw.parse()
        .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {err}")))
}

async fn connect_database() -> std::io::Result<Option<DbPool>> {
    let Ok(database_url) = env::var("DATABASE_URL") else {
        return Ok(None);
    };

    run_pending_migrations(&database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let ports = build_survey_ports(connect_database().await?);
    seed_on_startup(&SeedSettings::from_env(), &ports.poems, &ports.slots)
        .await
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr()?);
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config, ports.flow)?.await
}
