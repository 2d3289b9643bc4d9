//! HTTP adapter - REST API exposure.

pub mod chat;

pub use chat::{chat_routes, ChatHandlers};

use std::time::Duration;

use axum::Router;
use http::{HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Assembles the full application router with tracing, timeout, and CORS
/// middleware applied.
pub fn app_router(handlers: ChatHandlers, config: &ServerConfig) -> Router {
    chat_routes(handlers).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(cors_layer(config)),
    )
}

/// Builds the CORS layer from configuration.
///
/// No configured origins (development) allows any origin; configured
/// origins are matched exactly, skipping any that fail header parsing.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST];
    let origins = config.cors_origins_list();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(methods)
        .allow_headers(Any)
}
