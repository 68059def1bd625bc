use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin, limited to the methods and headers the API actually uses.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
