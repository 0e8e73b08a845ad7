use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use catalog_common::storage::allowed_extension;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::extractors::path::AppPath;
use crate::repository;
use crate::state::AppState;
use crate::utils::html;
use crate::utils::item::{self as items, ImageUpload};

/// Fields posted by the create and update forms.
struct ItemForm {
    name: String,
    description: String,
    image: Option<ImageUpload>,
}

fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// Read the `name`, `description` and `image` parts of a form post.
///
/// A file part with no filename, no content, or an extension outside the
/// allow-list is dropped rather than rejected.
async fn read_item_form(mut multipart: Multipart) -> Result<ItemForm, AppError> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Multipart error", e))?
    {
        match field.name() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Failed to read name", e))?,
                );
            }
            Some("description") => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Failed to read description", e))?,
                );
            }
            Some("image") => {
                let extension = field.file_name().and_then(allowed_extension);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Upload read error", e))?;
                match extension {
                    Some(extension) if !data.is_empty() => {
                        image = Some(ImageUpload {
                            data: data.to_vec(),
                            extension,
                        });
                    }
                    _ => debug!(size = data.len(), "Skipping image part"),
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    match (name, description) {
        (Some(name), Some(description)) => Ok(ItemForm {
            name,
            description,
            image,
        }),
        _ => Err(AppError::missing_fields()),
    }
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let models = repository::list_all(&state.db).await?;
    Ok(Html(html::index_page(&models)))
}

pub async fn create_form() -> Html<String> {
    Html(html::create_page())
}

#[instrument(skip(state, multipart))]
pub async fn create_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_item_form(multipart).await?;
    items::create_item(&state, form.name, form.description, form.image).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn update_form(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Html<String>, AppError> {
    let model = repository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("item not found".into()))?;
    Ok(Html(html::update_page(&model)))
}

#[instrument(skip(state, multipart))]
pub async fn update_submit(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = read_item_form(multipart).await?;
    items::update_item(&state, id, form.name, form.description, form.image).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn delete_submit(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Redirect, AppError> {
    items::delete_item(&state, id).await?;
    Ok(Redirect::to("/"))
}
