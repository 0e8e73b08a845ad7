use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Mount point of the image store root.
pub const STATIC_PREFIX: &str = "/static";

/// Strip the `static/` prefix that older rows carry, yielding a path relative
/// to the image store root.
pub fn stored_path(image_path: &str) -> &str {
    let path = image_path.trim_start_matches('/');
    path.strip_prefix("static/").unwrap_or(path)
}

/// Server-relative URL of a stored image, for use in rendered pages.
pub fn static_url(image_path: &str) -> String {
    format!("{STATIC_PREFIX}/{}", stored_path(image_path))
}

/// Absolute URL of a stored image.
pub fn public_url(base_url: &str, image_path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), static_url(image_path))
}

#[instrument(skip(state))]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(file_path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content = state.images.read(&file_path).await?;

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
