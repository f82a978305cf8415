use axum::Json;
use axum_auto_routes::route;

use crate::config::{API_DESCRIPTION, API_TITLE};
use crate::models::info::InfoApi;

/// Returns information about this api.
#[route(get, "/infoapi")]
pub async fn info_api() -> Json<InfoApi> {
    Json(InfoApi {
        title: API_TITLE,
        description: API_DESCRIPTION,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[route(get, "/ping")]
pub async fn ping() -> Json<&'static str> {
    Json("webAppAPI OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_info_api() {
        let Json(info) = info_api().await;
        assert_eq!(info.title, "Stable Protocol v0 API");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_ping() {
        let Json(body) = ping().await;
        assert_eq!(serde_json::to_string(&body).unwrap(), "\"webAppAPI OK\"");
    }
}
