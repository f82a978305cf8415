use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{self, AllowHeaders, AllowOrigin, CorsLayer};

/// `*` allows any origin, without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods([Method::GET])
            .allow_headers(cors::Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Matches a `Host` header (port ignored) against `*`, `*.domain` or exact entries.
pub fn host_is_allowed(host: &str, allowed: &[String]) -> bool {
    let host = host.split(':').next().unwrap_or_default();
    allowed.iter().any(|pattern| {
        pattern == "*"
            || match pattern.strip_prefix('*') {
                Some(suffix) if suffix.starts_with('.') => host.ends_with(suffix),
                _ => pattern == host,
            }
    })
}

pub async fn guard_host<B>(
    State(allowed): State<Arc<Vec<String>>>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if host_is_allowed(host, &allowed) {
        next.run(request).await
    } else {
        (StatusCode::BAD_REQUEST, "Invalid host header").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_exact_hosts() {
        let allowed = hosts(&["api.moneyonchain.com", "localhost"]);
        assert!(host_is_allowed("api.moneyonchain.com", &allowed));
        assert!(host_is_allowed("localhost:8000", &allowed));
        assert!(!host_is_allowed("evil.com", &allowed));
        assert!(!host_is_allowed("", &allowed));
    }

    #[test]
    fn test_wildcard_hosts() {
        let allowed = hosts(&["*.moneyonchain.com"]);
        assert!(host_is_allowed("api.moneyonchain.com", &allowed));
        assert!(!host_is_allowed("moneyonchain.com.evil.com", &allowed));
        assert!(!host_is_allowed("evilmoneyonchain.com", &allowed));

        assert!(host_is_allowed("anything", &hosts(&["*"])));
    }
}
