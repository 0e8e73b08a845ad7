//! Queries against the `items` table.
//!
//! Every statement goes through sea-orm and is parameter-bound.

use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::item;

/// Fields for a row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub image_path: Option<String>,
}

/// Fields written by an update. `image_path: None` keeps the current image.
#[derive(Debug, Clone)]
pub struct ItemChanges {
    pub name: String,
    pub description: String,
    pub image_path: Option<String>,
}

/// All items in insertion order.
pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<item::Model>, DbErr> {
    item::Entity::find()
        .order_by_asc(item::Column::Id)
        .all(db)
        .await
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<item::Model>, DbErr> {
    item::Entity::find_by_id(id).one(db).await
}

/// Insert a row and return its generated id.
pub async fn create<C: ConnectionTrait>(db: &C, new_item: NewItem) -> Result<i32, DbErr> {
    let active = item::ActiveModel {
        name: Set(new_item.name),
        description: Set(new_item.description),
        image_path: Set(new_item.image_path),
        ..Default::default()
    };

    let model = active.insert(db).await?;
    Ok(model.id)
}

/// Overwrite name and description, and the image path when a new one is given.
///
/// Returns the row as it was before the update, or `None` if no row has this id.
pub async fn update<C: TransactionTrait>(
    db: &C,
    id: i32,
    changes: ItemChanges,
) -> Result<Option<item::Model>, DbErr> {
    let txn = begin_write(db).await?;

    let Some(existing) = find_for_update(&txn, id).await? else {
        txn.rollback().await?;
        return Ok(None);
    };

    let mut active: item::ActiveModel = existing.clone().into();
    active.name = Set(changes.name);
    active.description = Set(changes.description);
    if let Some(path) = changes.image_path {
        active.image_path = Set(Some(path));
    }
    active.update(&txn).await?;

    txn.commit().await?;
    Ok(Some(existing))
}

/// Remove a row. Returns the removed row; `None` when nothing matched.
pub async fn delete<C: TransactionTrait>(db: &C, id: i32) -> Result<Option<item::Model>, DbErr> {
    let txn = begin_write(db).await?;

    let existing = find_for_update(&txn, id).await?;
    if existing.is_some() {
        item::Entity::delete_by_id(id).exec(&txn).await?;
    }

    txn.commit().await?;
    Ok(existing)
}

/// Start a read-then-write transaction.
///
/// SQLite ignores row locks, so its write lock is taken at `BEGIN`.
async fn begin_write<C: TransactionTrait>(db: &C) -> Result<C::Transaction, DbErr> {
    db.begin_with_options(TransactionOptions {
        sqlite_transaction_mode: Some(SqliteTransactionMode::Immediate),
        ..Default::default()
    })
    .await
}

async fn find_for_update<C: ConnectionTrait>(
    txn: &C,
    id: i32,
) -> Result<Option<item::Model>, DbErr> {
    item::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await
}
