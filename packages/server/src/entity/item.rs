use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Path relative to the image store root, e.g. `uploads/<uuid>.png`.
    pub image_path: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
