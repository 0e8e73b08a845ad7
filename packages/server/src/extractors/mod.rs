pub mod base_url;
pub mod json;
pub mod path;
