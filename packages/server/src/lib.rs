pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::error::ErrorBody;
use crate::models::item::{CreateItemRequest, ItemResponse, MessageResponse, UpdateItemRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "JSON API for the item catalog"
    ),
    paths(
        handlers::api::list_items,
        handlers::api::create_item,
        handlers::api::update_item,
        handlers::api::delete_item,
    ),
    components(schemas(
        ItemResponse,
        CreateItemRequest,
        UpdateItemRequest,
        MessageResponse,
        ErrorBody,
    )),
    tags(
        (name = "Items", description = "Item CRUD operations"),
    ),
)]
struct ApiDoc;

/// Largest request body accepted: one Base64-encoded image plus JSON framing.
fn body_limit(max_image_size: u64) -> usize {
    let encoded = max_image_size.div_ceil(3) * 4;
    usize::try_from(encoded + 64 * 1024).unwrap_or(usize::MAX)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    let allow_origin = if config.allow_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let limit = body_limit(state.config.storage.max_image_size);
    let cors = cors_layer(&state.config.server.cors);

    routes::page_routes()
        .nest("/api", routes::api_routes())
        .merge(routes::static_routes())
        .layer(DefaultBodyLimit::max(limit))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}
