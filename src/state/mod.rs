use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use thiserror::Error;

use axum::{body::Body, Router};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::logger::Logger;

pub mod database;
pub mod init;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database query failed")]
    QueryFailed(#[from] mongodb::error::Error),
    #[error("Data deserialization failed")]
    DeserializationFailed(#[from] mongodb::bson::de::Error),
    #[error("Other error: {0}")]
    Other(String),
}

pub struct AppState {
    pub logger: Logger,
    pub store: Store,
}

/// Single client handle, empty until `connect` succeeds and after `close`.
pub struct Store {
    client: RwLock<Option<Client>>,
    db_name: String,
}

impl Store {
    pub fn new<S: Into<String>>(db_name: S) -> Self {
        Store {
            client: RwLock::new(None),
            db_name: db_name.into(),
        }
    }

    /// Connects and pings the server, returning its version.
    pub async fn connect(&self, uri: &str) -> Result<String, DatabaseError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        let build_info = client
            .database(&self.db_name)
            .run_command(doc! { "buildInfo": 1 })
            .await?;
        let version = build_info
            .get_str("version")
            .unwrap_or("unknown")
            .to_string();

        *self.client.write().await = Some(client);
        Ok(version)
    }

    pub async fn database(&self) -> Option<Database> {
        self.client
            .read()
            .await
            .as_ref()
            .map(|client| client.database(&self.db_name))
    }

    /// Returns false when there was no connection to close.
    pub async fn close(&self) -> bool {
        let client = self.client.write().await.take();
        match client {
            Some(client) => {
                client.shutdown().await;
                true
            }
            None => false,
        }
    }
}

// required for axum_auto_routes
pub trait WithState: Send {
    fn to_router(self: Box<Self>, shared_state: Arc<AppState>) -> Router;

    fn box_clone(&self) -> Box<dyn WithState>;
}

impl WithState for Router<Arc<AppState>, Body> {
    fn to_router(self: Box<Self>, shared_state: Arc<AppState>) -> Router {
        self.with_state(shared_state)
    }

    fn box_clone(&self) -> Box<dyn WithState> {
        Box::new((*self).clone())
    }
}

impl Clone for Box<dyn WithState> {
    fn clone(&self) -> Box<dyn WithState> {
        self.box_clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_without_connection() {
        let store = Store::new("test");
        assert!(store.database().await.is_none());
        assert!(!store.close().await);
    }
}
