mod aggregation;
mod config;
mod logger;
mod models;
mod server;
mod state;
mod utils;

use axum::middleware;
use axum::Router;
use config::{ALLOWED_HOSTS, CORS_ORIGINS, SERVER_PORT};
use server::middleware::{cors_layer, guard_host};
use state::init::AppStateTraitInitializer;
use state::AppState;
use state::WithState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

lazy_static::lazy_static! {
    pub static ref ROUTE_REGISTRY: Mutex<Vec<Box<dyn WithState>>> = Mutex::new(Vec::new());
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let shared_state: Arc<AppState> = AppState::load().await;
    shared_state.logger.info(format!(
        "Starting webservice API version: {}",
        env!("CARGO_PKG_VERSION")
    ));

    // setup http server
    let mut app = ROUTE_REGISTRY
        .lock()
        .unwrap()
        .clone()
        .into_iter()
        .fold(Router::new(), |acc, r| {
            acc.merge(r.to_router(shared_state.clone()))
        });

    if let Some(origins) = CORS_ORIGINS.as_ref() {
        app = app.layer(cors_layer(origins));
    }
    if let Some(hosts) = ALLOWED_HOSTS.as_ref() {
        app = app.layer(middleware::from_fn_with_state(
            Arc::new(hosts.clone()),
            guard_host,
        ));
    }

    let server_port = *SERVER_PORT;
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    shared_state.logger.info(format!(
        "server: listening on http://0.0.0.0:{}",
        server_port
    ));

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        shared_state.logger.severe(format!("server error: {}", e));
    }

    if shared_state.store.close().await {
        shared_state.logger.info("Mongo connection closed.");
    } else {
        shared_state
            .logger
            .warning("Connection is None, nothing to close.");
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
