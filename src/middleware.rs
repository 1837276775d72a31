use axum::{
    extract::Request,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        request::Parts,
        HeaderName, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub async fn log_request(request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info!(
        method = %request.method(),
        path = request.uri().path(),
        origin,
        "request received"
    );
    next.run(request).await
}

/// Origins are compared byte-for-byte, so a literal `*` only matches a
/// request whose Origin header is `*`.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| allowed.contains(origin),
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}
