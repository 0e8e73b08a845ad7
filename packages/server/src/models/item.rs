use serde::{Deserialize, Serialize};

use crate::entity::item;
use crate::error::AppError;
use crate::handlers::uploads::public_url;

/// Body of `POST /api/create`. All fields are required.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    #[schema(example = "Widget")]
    pub name: Option<String>,
    #[schema(example = "A widget")]
    pub description: Option<String>,
    /// Base64-encoded image bytes, optionally as a `data:` URL.
    #[schema(example = "iVBORw0KGgo=")]
    pub image: Option<String>,
}

/// Body of `PUT /api/update/{id}`. Omitting `image` keeps the current one.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    #[schema(example = "Widget")]
    pub name: Option<String>,
    #[schema(example = "An improved widget")]
    pub description: Option<String>,
    pub image: Option<String>,
}

/// A create request whose required fields are all present.
pub struct ValidCreate {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// An update request whose required fields are present.
pub struct ValidUpdate {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

impl CreateItemRequest {
    pub fn validate(self) -> Result<ValidCreate, AppError> {
        match (self.name, self.description, self.image) {
            (Some(name), Some(description), Some(image)) => Ok(ValidCreate {
                name,
                description,
                image,
            }),
            _ => Err(AppError::missing_fields()),
        }
    }
}

impl UpdateItemRequest {
    pub fn validate(self) -> Result<ValidUpdate, AppError> {
        match (self.name, self.description) {
            (Some(name), Some(description)) => Ok(ValidUpdate {
                name,
                description,
                image: self.image,
            }),
            _ => Err(AppError::missing_fields()),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ItemResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "A widget")]
    pub description: String,
    /// Absolute URL of the item's image, or null.
    #[schema(example = "http://localhost:5001/static/uploads/5f0c9a3e.png")]
    pub image: Option<String>,
}

impl ItemResponse {
    pub fn from_model(model: item::Model, base_url: &str) -> Self {
        Self {
            image: model
                .image_path
                .as_deref()
                .map(|path| public_url(base_url, path)),
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "deleted")]
    pub message: String,
}
