use crate::server::ServerState;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tintenfass_common::model::auth::AuthKeys;
use tintenfass_db::client::{DbClient, DbError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error connecting to database: {0}")]
    DbConnect(sqlx::Error),
    #[error("Error migrating database: {0}")]
    Migrate(DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    database_url: String,
    token_secret: String,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tintenfass_api=debug,tintenfass_common=debug,tintenfass_db=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
}

/// The browser frontend runs on a different origin, so every response
/// carries permissive CORS headers.
fn app(state: ServerState) -> axum::Router {
    server::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let pool = PgPoolOptions::new()
        .connect(&env.database_url)
        .await
        .map_err(InitError::DbConnect)?;
    let db_client = Arc::new(DbClient::new(pool));
    db_client.migrate().await.map_err(InitError::Migrate)?;

    let state = ServerState {
        db_client,
        auth_keys: Arc::new(AuthKeys::from_secret(env.token_secret.as_bytes())),
    };

    let app = app(state);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    debug!(%server_address, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ServerState, app};
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tintenfass_common::model::auth::AuthKeys;
    use tintenfass_db::client::DbClient;
    use tower::ServiceExt;

    fn test_state() -> ServerState {
        // Lazy pool: no connection is made unless a query runs.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        ServerState {
            db_client: Arc::new(DbClient::new(pool)),
            auth_keys: Arc::new(AuthKeys::from_secret(b"test-secret")),
        }
    }

    #[tokio::test]
    async fn responses_carry_cors_headers() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app(test_state()).oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
