//! Route handlers for the info service.

use axum::extract::{Path, Query};
use axum::http::{header, HeaderValue, Method};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Frontend development origins allowed to call this API.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

const API_STATUS: &str = "API is healthy and connected!";

pub fn router() -> Router {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .map(|o| o.parse().expect("static origin is a valid header value"))
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(read_root))
        .route("/items/:item_id", get(read_item))
        .route("/api/info", get(api_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
struct GreetingResponse {
    message: &'static str,
}

async fn read_root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from the NDVI dashboard backend!",
    })
}

#[derive(Debug, Deserialize)]
struct ItemQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct ItemResponse {
    item_id: i64,
    q: Option<String>,
}

async fn read_item(
    Path(item_id): Path<i64>,
    Query(query): Query<ItemQuery>,
) -> Json<ItemResponse> {
    Json(ItemResponse {
        item_id,
        q: query.q,
    })
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    dashboard_version: &'static str,
    status: &'static str,
    /// Current UTC time, ISO-8601 with a trailing `Z`.
    timestamp: String,
}

async fn api_info() -> Json<InfoResponse> {
    Json(InfoResponse {
        dashboard_version: env!("CARGO_PKG_VERSION"),
        status: API_STATUS,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn root_returns_greeting() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello from the NDVI dashboard backend!");
    }

    #[tokio::test]
    async fn item_echoes_id_and_query() {
        let (status, body) = get_json("/items/42?q=hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["item_id"], 42);
        assert_eq!(body["q"], "hello");
    }

    #[tokio::test]
    async fn item_query_is_optional() {
        let (status, body) = get_json("/items/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["item_id"], 7);
        assert_eq!(body["q"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn item_id_must_be_an_integer() {
        let (status, _) = get_json("/items/not-a-number").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn info_has_version_status_and_utc_timestamp() {
        let (status, body) = get_json("/api/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dashboard_version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["status"], "API is healthy and connected!");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'), "expected trailing Z: {timestamp}");
        assert!(timestamp.contains('T'));
    }

    #[tokio::test]
    async fn cors_allows_the_dev_origins() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
    }

    #[tokio::test]
    async fn cors_ignores_unknown_origins() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
