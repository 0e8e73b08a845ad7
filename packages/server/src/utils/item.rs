//! Create, update and delete workflows shared by the HTML pages and the JSON API.
//!
//! Each workflow writes the image first and the row second. These are not one
//! transaction: a crash between the two can still leave an unreferenced file.
//! On ordinary failures the workflow removes the file it wrote.

use catalog_common::ImageStore;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::handlers::uploads::stored_path;
use crate::repository::{self, ItemChanges, NewItem};
use crate::state::AppState;

/// Decoded image bytes plus the extension to store them under.
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub extension: String,
}

pub async fn create_item(
    state: &AppState,
    name: String,
    description: String,
    image: Option<ImageUpload>,
) -> Result<i32, AppError> {
    let image_path = store_image(state, image).await?;

    let new_item = NewItem {
        name,
        description,
        image_path: image_path.clone(),
    };
    match repository::create(&state.db, new_item).await {
        Ok(id) => {
            info!(id, image = ?image_path, "Created item");
            Ok(id)
        }
        Err(e) => {
            if let Some(path) = &image_path {
                discard_image(&*state.images, path).await;
            }
            Err(e.into())
        }
    }
}

/// Overwrite name and description; replace the image only when one is supplied.
pub async fn update_item(
    state: &AppState,
    id: i32,
    name: String,
    description: String,
    image: Option<ImageUpload>,
) -> Result<(), AppError> {
    let new_path = store_image(state, image).await?;

    let changes = ItemChanges {
        name,
        description,
        image_path: new_path.clone(),
    };
    let result = repository::update(&state.db, id, changes).await;

    match result {
        Ok(Some(previous)) => {
            info!(id, replaced_image = new_path.is_some(), "Updated item");
            if new_path.is_some()
                && let Some(old) = previous.image_path.as_deref()
            {
                discard_image(&*state.images, old).await;
            }
            Ok(())
        }
        Ok(None) => {
            if let Some(path) = &new_path {
                discard_image(&*state.images, path).await;
            }
            Err(AppError::NotFound("item not found".into()))
        }
        Err(e) => {
            if let Some(path) = &new_path {
                discard_image(&*state.images, path).await;
            }
            Err(e.into())
        }
    }
}

/// Delete an item and its image. Returns whether a row existed.
pub async fn delete_item(state: &AppState, id: i32) -> Result<bool, AppError> {
    let removed = repository::delete(&state.db, id).await?;

    match &removed {
        Some(model) => {
            info!(id, "Deleted item");
            if let Some(path) = model.image_path.as_deref() {
                discard_image(&*state.images, path).await;
            }
        }
        None => debug!(id, "Delete of missing item ignored"),
    }

    Ok(removed.is_some())
}

async fn store_image(
    state: &AppState,
    image: Option<ImageUpload>,
) -> Result<Option<String>, AppError> {
    match image {
        Some(upload) => Ok(Some(
            state.images.store(&upload.data, &upload.extension).await?,
        )),
        None => Ok(None),
    }
}

/// Best-effort removal of an image that no row references any more.
async fn discard_image(images: &dyn ImageStore, path: &str) {
    match images.remove(stored_path(path)).await {
        Ok(true) => debug!(path, "Removed unreferenced image"),
        Ok(false) => debug!(path, "Unreferenced image already gone"),
        Err(e) => warn!(path, "Failed to remove unreferenced image: {e}"),
    }
}
