use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Browser-facing pages and form posts.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            "/create",
            get(handlers::pages::create_form).post(handlers::pages::create_submit),
        )
        .route(
            "/update/{id}",
            get(handlers::pages::update_form).post(handlers::pages::update_submit),
        )
        .route("/delete/{id}", post(handlers::pages::delete_submit))
}

/// JSON API, nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::api::list_items))
        .route("/create", post(handlers::api::create_item))
        .route("/update/{id}", put(handlers::api::update_item))
        .route("/delete/{id}", delete(handlers::api::delete_item))
}

/// Uploaded images, served from the image store root.
pub fn static_routes() -> Router<AppState> {
    Router::new().route(
        &format!("{}/{{*path}}", handlers::uploads::STATIC_PREFIX),
        get(handlers::uploads::serve_upload),
    )
}
