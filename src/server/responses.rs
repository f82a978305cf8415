// server/responses.rs
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{aggregation::QueryError, models::params::OutputFormat, state::DatabaseError, utils::tables::Sheet};

const STORE_UNAVAILABLE: &str = "Cannot get DB access";

#[derive(Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", STORE_UNAVAILABLE)]
    StoreUnavailable,
    #[error("{0}")]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(DatabaseError::QueryFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Database(DatabaseError::QueryFailed(_)) => STORE_UNAVAILABLE.to_string(),
            ApiError::Database(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::NewAccountsSum | QueryError::AllTokensSum => {
                ApiError::BadRequest(error.to_string())
            }
            QueryError::GovernanceMintRedeem => ApiError::NotFound(error.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorDetail {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}

/// Renders a sheet as text or CSV; `attachment` names the downloaded file without extension.
pub fn sheet_response(
    sheet: &Sheet,
    format: OutputFormat,
    attachment: Option<String>,
) -> Result<Response, ApiError> {
    let (content_type, extension, body) = match format {
        OutputFormat::Csv => (
            "text/csv; charset=utf-8",
            "csv",
            sheet.to_csv().map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
        OutputFormat::Text | OutputFormat::Json => {
            ("text/plain; charset=utf-8", "txt", sheet.to_text())
        }
    };

    let response = match attachment {
        Some(name) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.{}\"", name, extension),
                ),
            ],
            body,
        )
            .into_response(),
        None => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type.to_string())],
            body,
        )
            .into_response(),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transactions::tests::sample_transaction;
    use crate::utils::tables::ledger_sheet;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(QueryError::NewAccountsSum).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(QueryError::AllTokensSum).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(QueryError::GovernanceMintRedeem).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unprocessable("limit".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(DatabaseError::Other("bad value".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(ApiError::StoreUnavailable.detail(), "Cannot get DB access");
        assert_eq!(
            ApiError::from(DatabaseError::Other("bad value".to_string())).detail(),
            "Internal Server Error"
        );
        assert_eq!(
            ApiError::BadRequest("nope".to_string()).detail(),
            "nope"
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::StoreUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn test_sheet_attachment_headers() {
        let sheet = ledger_sheet(&[sample_transaction(
            "StableTokenMint",
            "1500000000000000000",
            None,
        )]);

        let response = sheet_response(
            &sheet,
            OutputFormat::Csv,
            Some("transactions_0xab_20240101_000000".to_string()),
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"transactions_0xab_20240101_000000.csv\""
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let response = sheet_response(&sheet, OutputFormat::Text, None).unwrap();
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
