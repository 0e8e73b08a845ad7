use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use catalog_common::storage::{ImageFormat, decode_base64_image};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::base_url::PublicBaseUrl;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::item::*;
use crate::repository;
use crate::state::AppState;
use crate::utils::item::{self as items, ImageUpload};

/// Decode a Base64 payload and pick the extension from its magic bytes.
fn decode_upload(payload: &str) -> Result<ImageUpload, AppError> {
    let data = decode_base64_image(payload)?;
    let extension = ImageFormat::extension_for(&data).to_string();
    Ok(ImageUpload { data, extension })
}

#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Items",
    operation_id = "listItems",
    summary = "List all items",
    description = "Returns every item in insertion order. `image` is an absolute URL, or null when the item has no image.",
    responses(
        (status = 200, description = "All items", body = [ItemResponse]),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url))]
pub async fn list_items(
    State(state): State<AppState>,
    PublicBaseUrl(base_url): PublicBaseUrl,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let models = repository::list_all(&state.db).await?;

    Ok(Json(
        models
            .into_iter()
            .map(|model| ItemResponse::from_model(model, &base_url))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/create",
    tag = "Items",
    operation_id = "createItem",
    summary = "Create an item with an image",
    description = "Creates an item. `name`, `description` and the Base64 `image` are all required. \
        Any decodable payload is accepted; the stored file extension follows the detected \
        image format and defaults to `.jpg`.",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Missing fields or undecodable image", body = ErrorBody),
        (status = 413, description = "Image too large", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemRequest>,
) -> Result<StatusCode, AppError> {
    let req = payload.validate()?;
    let upload = decode_upload(&req.image)?;

    items::create_item(&state, req.name, req.description, Some(upload)).await?;

    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/api/update/{id}",
    tag = "Items",
    operation_id = "updateItem",
    summary = "Update an item",
    description = "Overwrites `name` and `description`. When `image` is present it replaces the \
        current image; when absent the current image is kept.",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "Missing fields or undecodable image", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 413, description = "Image too large", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> Result<StatusCode, AppError> {
    let req = payload.validate()?;
    let upload = req.image.as_deref().map(decode_upload).transpose()?;

    items::update_item(&state, id, req.name, req.description, upload).await?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/api/delete/{id}",
    tag = "Items",
    operation_id = "deleteItem",
    summary = "Delete an item",
    description = "Deletes the item and its image. Deleting an id that does not exist also succeeds.",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 400, description = "Invalid item id", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    items::delete_item(&state, id).await?;

    Ok(Json(MessageResponse {
        message: "deleted".into(),
    }))
}
