use std::sync::Arc;

use crate::{
    config::{MONGO_DB, MONGO_URI},
    logger::Logger,
    state::{AppState, Store},
};

pub trait AppStateTraitInitializer {
    async fn load() -> Arc<Self>;
}

impl AppStateTraitInitializer for AppState {
    async fn load() -> Arc<Self> {
        let logger = Logger::new();
        let store = Store::new(MONGO_DB.as_str());

        // keep serving without a handle: data routes answer 503
        match store.connect(&MONGO_URI).await {
            Ok(version) => logger.info(format!("Connected to mongo! (version {}).", version)),
            Err(e) => logger.severe(format!("Could not connect to mongo: {:?}", e)),
        }

        Arc::new(AppState { logger, store })
    }
}
