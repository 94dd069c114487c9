#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use dotenvy::dotenv;
use errors::ApplicationError;
use router::setup_router;
use state::{AppState, DocsAuth};
use std::env;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod envelope;
mod errors;
mod extract;
mod model;
mod router;
mod service;
mod state;

#[cfg(test)]
mod test;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    if let Err(e) = run().await {
        // Print the error using Display
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> Result<(), ApplicationError> {
    setup_tracing();

    let config = setup_env()?;

    // Ensure the data directory exists
    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        ApplicationError::Internal(format!("Failed to create data directory: {}", e))
    })?;

    let store_path = config.data_dir.join("noted.db");
    let store = noted_core::open_store(&store_path)
        .map_err(|e| ApplicationError::Internal(format!("Failed to open store: {}", e)))?;
    info!("Document store ready at {:?}", store_path);

    let app = setup_router(AppState::new(store, config.docs_auth));

    let address = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", address);

    let listener = TcpListener::bind(address)
        .await
        .map_err(ApplicationError::from)?;

    info!(
        "Listening on: {}",
        listener.local_addr().map_err(ApplicationError::from)?
    );

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ApplicationError::CannotServe)?;
    Ok(())
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{crate_name}=debug,tower_http=debug",
                    crate_name = env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

struct Config {
    host: String,
    port: String,
    data_dir: PathBuf,
    docs_auth: Option<DocsAuth>,
}

fn setup_env() -> Result<Config, ApplicationError> {
    dotenv().ok();

    let host = std::env::var("NOTED_HOST")
        .map_err(|e| ApplicationError::EnvError(e, "NOTED_HOST".to_string()))?;
    let port = std::env::var("NOTED_PORT")
        .map_err(|e| ApplicationError::EnvError(e, "NOTED_PORT".to_string()))?;
    let data_dir = env::var("NOTED_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

    // Docs stay open unless both credentials are set
    let docs_auth = match (env::var("NOTED_DOCS_USER"), env::var("NOTED_DOCS_PASSWORD")) {
        (Ok(user), Ok(password)) => Some(DocsAuth { user, password }),
        _ => None,
    };

    Ok(Config {
        host,
        port,
        data_dir: PathBuf::from(data_dir),
        docs_auth,
    })
}
