use std::sync::Arc;

use crate::models::params::OutputFormat;
use crate::models::transactions::{TokenName, TransactionsList, EXCLUDED_EVENTS};
use crate::server::responses::{sheet_response, ApiError};
use crate::server::{check_address, check_pagination, get_db, store_failure};
use crate::state::database::DatabaseExt;
use crate::state::AppState;
use crate::utils::general::DEFAULT_ADDRESS;
use crate::utils::tables::ledger_sheet;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_auto_routes::route;
use chrono::Utc;
use mongodb::bson::{doc, Document};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransactionsListQuery {
    #[serde(default = "default_address")]
    address: String,
    token: Option<TokenName>,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    skip: u32,
    #[serde(default)]
    format: OutputFormat,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_limit() -> u32 {
    100
}

/// Case-insensitive, unanchored match on the address; hidden events are left out.
pub fn transactions_filter(address: &str, token: Option<TokenName>) -> Document {
    let mut filter = doc! {
        "address": { "$regex": address, "$options": "i" },
        "event": { "$not": { "$in": EXCLUDED_EVENTS.to_vec() } }
    };
    if let Some(token) = token {
        filter.insert("tokenInvolved", token.as_str());
    }
    filter
}

/// Lists the operations of the given address, newest first.
#[route(get, "/api/v1/webapp/transactions/list/")]
pub async fn transactions_list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TransactionsListQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    check_address(&params.address)?;
    check_pagination(params.limit, params.skip)?;

    let db = get_db(&state).await?;
    let filter = transactions_filter(&params.address, params.token);

    let transactions = db
        .find_transactions(filter.clone(), u64::from(params.skip), i64::from(params.limit))
        .await
        .map_err(|e| store_failure(&state, "transactions", e))?;
    let total = db
        .count_transactions(filter)
        .await
        .map_err(|e| store_failure(&state, "transactions count", e))?;

    match params.format {
        OutputFormat::Json => Ok(Json(TransactionsList {
            count: transactions.len(),
            total,
            transactions,
        })
        .into_response()),
        format => {
            let name = format!(
                "transactions_{}_{}",
                params.address.to_lowercase(),
                Utc::now().format("%Y%m%d_%H%M%S")
            );
            sheet_response(&ledger_sheet(&transactions), format, Some(name))
        }
    }
}
