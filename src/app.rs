use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, normalize_path::NormalizePath, trace::TraceLayer,
};

use crate::error::panic_response;
use crate::handlers::{
    create_transaction, funnel_data, health, not_found, root, status, test_payload,
};
use crate::middleware::{cors_layer, log_request};
use crate::state::AppState;

/// Router wrapped so `/health/` routes like `/health`.
pub type App = NormalizePath<Router>;

pub fn build_router(state: AppState) -> App {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/test", get(test_payload))
        .route("/funnel-data", get(funnel_data))
        .route("/aureolink/create", post(create_transaction))
        .fallback(not_found)
        // Known path, wrong method: same 404 body as an unknown path.
        .method_not_allowed_fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> App {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: App, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app(), request).await
    }

    fn create_request(content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/aureolink/create")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_online() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert!(body["uptimeSeconds"].as_f64().unwrap() >= 0.0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn status_reports_process_introspection() {
        let (status, body) = get_json("/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "CNH Social Backend");
        assert_eq!(body["version"], "2.0.0");
        assert_eq!(body["environment"], "production");
        assert_eq!(body["platform"], "Railway");
        assert_eq!(body["osPlatform"], std::env::consts::OS);
        assert!(body["uptimeSeconds"].as_f64().unwrap() >= 0.0);

        let memory = body["memoryUsage"].as_object().unwrap();
        assert!(memory.values().any(Value::is_u64));
    }

    #[tokio::test]
    async fn test_endpoint_is_constant() {
        for _ in 0..2 {
            let (status, body) = get_json("/test").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["data"]["amount"], 6472);
            assert_eq!(body["data"]["customer"]["name"], "Maria Santos");
            assert_eq!(body["data"]["items"][0]["unit_amount"], 6472);
        }
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["endpoints"],
            json!({"health": "/health", "status": "/status", "test": "/test"})
        );
    }

    #[tokio::test]
    async fn funnel_data_is_simulated_snapshot() {
        let (status, body) = get_json("/funnel-data").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_orders"], 1247);
        assert_eq!(body["data"]["last_transaction"]["id"], "txn_123456789");
    }

    #[tokio::test]
    async fn create_echoes_json_body() {
        let app = app();
        let body = r#"{"amount": 1000, "customer": "X", "items": []}"#;

        let (status, first) = send(app.clone(), create_request("application/json", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["success"], true);
        assert_eq!(first["amount"], 1000);
        assert_eq!(first["customer"], "X");

        let id = first["transaction_id"].as_str().unwrap();
        let digits = id.strip_prefix("txn_").unwrap();
        assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));

        let (_, second) = send(app, create_request("application/json", body)).await;
        assert_ne!(first["transaction_id"], second["transaction_id"]);
    }

    #[tokio::test]
    async fn create_tolerates_missing_fields() {
        let (status, body) = send(app(), create_request("application/json", "{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body.get("amount").is_none());
        assert!(body.get("customer").is_none());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/aureolink/create")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["transaction_id"].is_string());
    }

    #[tokio::test]
    async fn create_accepts_form_body() {
        let request = create_request(
            "application/x-www-form-urlencoded",
            "amount=1000&customer=Maria",
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], "1000");
        assert_eq!(body["customer"], "Maria");
    }

    #[tokio::test]
    async fn malformed_json_is_internal_error() {
        let request = create_request("application/json", "{\"amount\":");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erro interno do servidor");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, body) = get_json("/unknown-path?x=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint não encontrado");
        assert_eq!(body["path"], "/unknown-path");
    }

    #[tokio::test]
    async fn preflight_advertises_methods() {
        for uri in ["/health", "/aureolink/create", "/unknown-path"] {
            let request = Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .header(header::ORIGIN, "https://app.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert!(response.status().is_success());

            let headers = response.headers();
            let methods = headers
                .get(header::ACCESS_CONTROL_ALLOW_METHODS)
                .unwrap()
                .to_str()
                .unwrap();
            for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
                assert!(methods.contains(method), "missing {method} in {methods}");
            }
            assert_eq!(
                headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
                "true"
            );
            // The literal "*" entry never matches a real origin.
            assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        }
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let config = Config {
            cors_allowed_origins: vec!["https://app.example".to_string()],
            ..Config::default()
        };
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://app.example")
            .body(Body::empty())
            .unwrap();
        let response = build_router(AppState::new(config))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://app.example"
        );
    }

    #[tokio::test]
    async fn wrong_method_on_known_path_is_not_found() {
        for (method, uri) in [
            (Method::POST, "/health"),
            (Method::GET, "/aureolink/create"),
            (Method::DELETE, "/"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(app(), request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body["error"], "Endpoint não encontrado");
            assert_eq!(body["path"], uri);
        }
    }

    #[tokio::test]
    async fn create_echoes_nested_form_fields() {
        let request = create_request(
            "application/x-www-form-urlencoded",
            "amount=5&customer%5Bname%5D=Maria&customer%5Bemail%5D=m%40example.com",
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], "5");
        assert_eq!(
            body["customer"],
            json!({"name": "Maria", "email": "m@example.com"})
        );
    }

    #[tokio::test]
    async fn trailing_slash_reaches_the_same_route() {
        let (status, body) = get_json("/health/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");

        let (status, _) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
    }
}
