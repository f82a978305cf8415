use std::sync::Arc;

use crate::aggregation::{StatsQuery, TopTransactorsQuery};
use crate::models::params::{CountType, EventScope, OutputFormat, Period, StatFunction, TokenScope};
use crate::models::stats::{
    AccountsList, BucketValue, CountByDate, TopTransactorsList, TransactionsStats, TransactorValue,
    ValueByDate, VolumeList,
};
use crate::server::responses::{sheet_response, ApiError};
use crate::server::{get_db, store_failure};
use crate::state::database::DatabaseExt;
use crate::state::AppState;
use crate::utils::dates::days_ago;
use crate::utils::tables::{transactors_sheet, volumes_sheet};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_auto_routes::route;
use mongodb::bson::Document;
use serde::Deserialize;

const MAX_DAYS: u32 = 3650;
const MAX_TOP: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct NewAccountsQuery {
    #[serde(default)]
    token: TokenScope,
    #[serde(default)]
    filter: EventScope,
    #[serde(default)]
    group_by: Period,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsStatsQuery {
    #[serde(default = "default_kind", rename = "type")]
    kind: CountType,
    #[serde(default)]
    token: TokenScope,
    #[serde(default)]
    filter: EventScope,
    #[serde(default)]
    group_by: Period,
}

#[derive(Debug, Deserialize)]
pub struct VolumeQuery {
    #[serde(default)]
    filter: EventScope,
    #[serde(default)]
    group_by: Period,
    #[serde(default)]
    format: OutputFormat,
}

#[derive(Debug, Deserialize)]
pub struct TopTransactorsParams {
    #[serde(default)]
    token: TokenScope,
    #[serde(default)]
    filter: EventScope,
    #[serde(default)]
    fnc: StatFunction,
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_top")]
    top: u32,
    #[serde(default)]
    format: OutputFormat,
}

fn default_kind() -> CountType {
    CountType::OnlyNewAccounts
}

fn default_days() -> u32 {
    30
}

fn default_top() -> u32 {
    10
}

async fn aggregate(
    state: &AppState,
    pipeline: Vec<Document>,
    fnc: StatFunction,
) -> Result<Vec<(String, BucketValue)>, ApiError> {
    let db = get_db(state).await?;
    let documents = db
        .aggregate_transactions(pipeline)
        .await
        .map_err(|e| store_failure(state, "transaction stats", e))?;

    documents
        .into_iter()
        .map(|document| {
            let value = document
                .bucket_value(fnc)
                .map_err(|e| store_failure(state, "transaction stats", e))?;
            Ok((document.key, value))
        })
        .collect()
}

async fn date_series(state: &AppState, query: &StatsQuery) -> Result<Vec<ValueByDate>, ApiError> {
    let pipeline = query.pipeline()?;
    let buckets = aggregate(state, pipeline, query.fnc).await?;
    Ok(buckets
        .into_iter()
        .map(|(date, value)| ValueByDate { date, value })
        .collect())
}

/// Returns the amount of addresses seen for the first time per _day_, _week_, _month_ or _year_.
#[route(get, "/api/v1/stats/new-accounts/")]
pub async fn new_accounts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NewAccountsQuery>, QueryRejection>,
) -> Result<Json<AccountsList>, ApiError> {
    let Query(params) = query?;
    let stats = StatsQuery {
        kind: CountType::OnlyNewAccounts,
        token: params.token,
        event: params.filter,
        period: params.group_by,
        fnc: StatFunction::Count,
    };

    let accounts = date_series(&state, &stats)
        .await?
        .into_iter()
        .map(|bucket| match bucket.value {
            BucketValue::Count(count) => Ok(CountByDate {
                date: bucket.date,
                count,
            }),
            other => Err(ApiError::Internal(format!(
                "unexpected account count {} for {}",
                other, bucket.date
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(AccountsList::new(
        accounts,
        params.token,
        params.filter,
        params.group_by,
    )))
}

/// Returns the amount (per _day_, _week_, _month_ or _year_) of transactions, counted or summed.
#[route(get, "/api/v1/stats/transactions/:fnc")]
pub async fn transactions_stats(
    State(state): State<Arc<AppState>>,
    fnc: Result<Path<StatFunction>, PathRejection>,
    query: Result<Query<TransactionsStatsQuery>, QueryRejection>,
) -> Result<Json<TransactionsStats>, ApiError> {
    let Path(fnc) = fnc?;
    let Query(params) = query?;
    let stats = StatsQuery {
        kind: params.kind,
        token: params.token,
        event: params.filter,
        period: params.group_by,
        fnc,
    };

    let values = date_series(&state, &stats).await?;
    Ok(Json(TransactionsStats::new(
        values,
        fnc,
        params.kind,
        params.token,
        params.filter,
        params.group_by,
    )))
}

/// Returns the volume of a token per _day_, _week_, _month_ or _year_.
#[route(get, "/api/v1/stats/volumen/:token")]
pub async fn volumen(
    State(state): State<Arc<AppState>>,
    token: Result<Path<TokenScope>, PathRejection>,
    query: Result<Query<VolumeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(token) = token?;
    let Query(params) = query?;
    let stats = StatsQuery {
        kind: CountType::All,
        token,
        event: params.filter,
        period: params.group_by,
        fnc: StatFunction::Sum,
    };

    let volumes = date_series(&state, &stats).await?;
    match params.format {
        OutputFormat::Json => Ok(Json(VolumeList::new(
            volumes,
            token,
            params.filter,
            params.group_by,
        ))
        .into_response()),
        format => sheet_response(&volumes_sheet(&volumes), format, None),
    }
}

/// Returns the addresses with the most transactions (or volume) over the last days.
#[route(get, "/api/v1/stats/top_transactors")]
pub async fn top_transactors(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopTransactorsParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    if params.days == 0 || params.days > MAX_DAYS {
        return Err(ApiError::Unprocessable(format!(
            "days must be between 1 and {}",
            MAX_DAYS
        )));
    }
    if params.top == 0 || params.top > MAX_TOP {
        return Err(ApiError::Unprocessable(format!(
            "top must be between 1 and {}",
            MAX_TOP
        )));
    }

    let ranking = TopTransactorsQuery {
        token: params.token,
        event: params.filter,
        fnc: params.fnc,
        since: days_ago(params.days),
        top: params.top,
    };
    let pipeline = ranking.pipeline()?;
    let transactors: Vec<TransactorValue> = aggregate(&state, pipeline, params.fnc)
        .await?
        .into_iter()
        .map(|(address, value)| TransactorValue { address, value })
        .collect();

    match params.format {
        OutputFormat::Json => Ok(Json(TopTransactorsList {
            count: transactors.len(),
            transactors,
            fnc: params.fnc,
            token: params.token,
            filter: params.filter,
            days: params.days,
            top: params.top,
        })
        .into_response()),
        format => sheet_response(&transactors_sheet(&transactors), format, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests::{offline_state, status_of};
    use axum::http::StatusCode;

    fn stats_params(kind: CountType, token: TokenScope, filter: EventScope) -> TransactionsStatsQuery {
        TransactionsStatsQuery {
            kind,
            token,
            filter,
            group_by: Period::Week,
        }
    }

    fn top_params(days: u32, top: u32) -> TopTransactorsParams {
        TopTransactorsParams {
            token: TokenScope::All,
            filter: EventScope::All,
            fnc: StatFunction::Count,
            days,
            top,
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_query_parsing() {
        let params: TransactionsStatsQuery =
            serde_json::from_str(r#"{"type": "only_new_accounts", "group_by": "week"}"#).unwrap();
        assert_eq!(params.kind, CountType::OnlyNewAccounts);
        assert_eq!(params.group_by, Period::Week);
        assert_eq!(params.token, TokenScope::All);

        let params: TransactionsStatsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(params.kind, CountType::OnlyNewAccounts);
        assert_eq!(params.group_by, Period::Day);

        let params: TopTransactorsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.days, 30);
        assert_eq!(params.top, 10);
        assert_eq!(params.fnc, StatFunction::Count);
    }

    #[tokio::test]
    async fn test_new_accounts_store_unavailable() {
        let params = NewAccountsQuery {
            token: TokenScope::All,
            filter: EventScope::All,
            group_by: Period::Week,
        };
        let result = new_accounts(State(offline_state()), Ok(Query(params))).await;
        assert!(matches!(result, Err(ApiError::StoreUnavailable)));
    }

    #[tokio::test]
    async fn test_new_accounts_sum_is_bad_request() {
        let result = transactions_stats(
            State(offline_state()),
            Ok(Path(StatFunction::Sum)),
            Ok(Query(stats_params(
                CountType::OnlyNewAccounts,
                TokenScope::Stable,
                EventScope::All,
            ))),
        )
        .await;
        match result {
            Err(error) => assert_eq!(error.status_code(), StatusCode::BAD_REQUEST),
            Ok(_) => panic!("new accounts cannot be summed"),
        }
    }

    #[tokio::test]
    async fn test_bare_sum_is_bad_request() {
        let params: TransactionsStatsQuery = serde_json::from_str("{}").unwrap();
        let result = transactions_stats(
            State(offline_state()),
            Ok(Path(StatFunction::Sum)),
            Ok(Query(params)),
        )
        .await;
        match result {
            Err(error) => assert_eq!(error.status_code(), StatusCode::BAD_REQUEST),
            Ok(_) => panic!("sum defaults to new accounts and must be rejected"),
        }
    }

    #[tokio::test]
    async fn test_governance_mint_is_not_found() {
        let result = transactions_stats(
            State(offline_state()),
            Ok(Path(StatFunction::Count)),
            Ok(Query(stats_params(
                CountType::All,
                TokenScope::Governance,
                EventScope::Mint,
            ))),
        )
        .await;
        match result {
            Err(error) => assert_eq!(error.status_code(), StatusCode::NOT_FOUND),
            Ok(_) => panic!("governance token has no mint events"),
        }
    }

    #[tokio::test]
    async fn test_volumen_needs_a_token() {
        let params = VolumeQuery {
            filter: EventScope::All,
            group_by: Period::Month,
            format: OutputFormat::Json,
        };
        let result = volumen(State(offline_state()), Ok(Path(TokenScope::All)), Ok(Query(params))).await;
        assert_eq!(status_of(result), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_volumen_store_unavailable() {
        let params = VolumeQuery {
            filter: EventScope::All,
            group_by: Period::Month,
            format: OutputFormat::Text,
        };
        let result = volumen(
            State(offline_state()),
            Ok(Path(TokenScope::Stable)),
            Ok(Query(params)),
        )
        .await;
        assert_eq!(status_of(result), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_top_transactors_bounds() {
        for (days, top) in [(0, 10), (MAX_DAYS + 1, 10), (30, 0), (30, MAX_TOP + 1)] {
            let result = top_transactors(State(offline_state()), Ok(Query(top_params(days, top)))).await;
            assert_eq!(status_of(result), StatusCode::UNPROCESSABLE_ENTITY);
        }

        let result = top_transactors(State(offline_state()), Ok(Query(top_params(7, 5)))).await;
        assert_eq!(status_of(result), StatusCode::SERVICE_UNAVAILABLE);
    }
}
