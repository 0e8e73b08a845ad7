pub mod html;
pub mod item;
