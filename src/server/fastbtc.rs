use std::sync::Arc;

use crate::models::fastbtc::PegOutList;
use crate::server::responses::ApiError;
use crate::server::{check_address, check_pagination, get_db, store_failure};
use crate::state::database::DatabaseExt;
use crate::state::AppState;
use crate::utils::general::DEFAULT_ADDRESS;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use axum_auto_routes::route;
use mongodb::bson::{doc, Document};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PegOutQuery {
    #[serde(default = "default_address")]
    address: String,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    skip: u32,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_limit() -> u32 {
    20
}

pub fn pegout_filter(address: &str) -> Document {
    doc! {
        "rskAddress": { "$regex": address, "$options": "i" },
        "type": "PEG_OUT"
    }
}

/// Returns the pegout requests from an address, newest first.
#[route(get, "/api/v1/webapp/fastbtc/pegout/")]
pub async fn pegout_list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PegOutQuery>, QueryRejection>,
) -> Result<Json<PegOutList>, ApiError> {
    let Query(params) = query?;
    check_address(&params.address)?;
    check_pagination(params.limit, params.skip)?;

    let db = get_db(&state).await?;
    let filter = pegout_filter(&params.address);

    let pegout_requests = db
        .find_pegouts(filter.clone(), u64::from(params.skip), i64::from(params.limit))
        .await
        .map_err(|e| store_failure(&state, "pegout requests", e))?;
    let total = db
        .count_pegouts(filter)
        .await
        .map_err(|e| store_failure(&state, "pegout requests count", e))?;

    Ok(Json(PegOutList {
        count: pegout_requests.len(),
        total,
        pegout_requests,
    }))
}
