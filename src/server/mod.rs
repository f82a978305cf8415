use mongodb::Database;

use crate::{
    state::{AppState, DatabaseError},
    utils::general::is_valid_address,
};

use self::responses::ApiError;

pub mod diagnosis;
pub mod fastbtc;
pub mod middleware;
pub mod responses;
pub mod stats;
pub mod transactions;

pub const MAX_LIMIT: u32 = 1000;
pub const MAX_SKIP: u32 = 10000;

pub async fn get_db(state: &AppState) -> Result<Database, ApiError> {
    match state.store.database().await {
        Some(db) => Ok(db),
        None => {
            state.logger.warning("Connection is None, nothing to get.");
            Err(ApiError::StoreUnavailable)
        }
    }
}

pub fn store_failure(state: &AppState, context: &str, error: DatabaseError) -> ApiError {
    state
        .logger
        .warning(format!("Database error while loading {}: {:?}", context, error));
    ApiError::from(error)
}

pub fn check_address(address: &str) -> Result<(), ApiError> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(ApiError::Unprocessable(format!(
            "address must match ^0x[a-fA-F0-9]{{40}}$, got {:?}",
            address
        )))
    }
}

pub fn check_pagination(limit: u32, skip: u32) -> Result<(), ApiError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::Unprocessable(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    if skip > MAX_SKIP {
        return Err(ApiError::Unprocessable(format!(
            "skip must be less than or equal to {}",
            MAX_SKIP
        )));
    }
    Ok(())
}
