use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Scheme and authority used to build absolute image URLs, without a trailing slash.
///
/// Taken from `server.public_url` when configured, otherwise from the request's
/// `Host` header.
pub struct PublicBaseUrl(pub String);

impl FromRequestParts<AppState> for PublicBaseUrl {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(url) = &state.config.server.public_url {
            return Ok(PublicBaseUrl(url.trim_end_matches('/').to_string()));
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| {
                format!("{}:{}", state.config.server.host, state.config.server.port)
            });

        Ok(PublicBaseUrl(format!("http://{host}")))
    }
}
