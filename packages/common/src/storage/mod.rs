mod error;
mod image;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use image::{
    ALLOWED_EXTENSIONS, DEFAULT_EXTENSION, ImageDecodeError, ImageFormat, allowed_extension,
    decode_base64_image,
};
pub use traits::ImageStore;
