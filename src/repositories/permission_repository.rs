use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::{Database, Sequences},
    errors::{AppError, AppResult},
    models::domain::{NewPermission, Permission},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn insert(&self, permission: NewPermission) -> AppResult<Permission>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>>;
    /// Fetches the subset of `ids` that exist, ordered by id. Unknown ids are
    /// silently skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Permission>>;
    async fn find_all(&self) -> AppResult<Vec<Permission>>;
    async fn update(&self, permission: Permission) -> AppResult<Permission>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoPermissionRepository {
    collection: Collection<Permission>,
    sequences: Sequences,
}

impl MongoPermissionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("permissions"),
            sequences: Sequences::new(db),
        }
    }
}

#[async_trait]
impl PermissionRepository for MongoPermissionRepository {
    async fn insert(&self, permission: NewPermission) -> AppResult<Permission> {
        let permission = Permission {
            id: self.sequences.next_id("permissions").await?,
            name: permission.name,
            description: permission.description,
            resource: permission.resource,
            action: permission.action,
        };
        self.collection.insert_one(&permission).await?;
        Ok(permission)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        let permission = self.collection.find_one(doc! { "id": id }).await?;
        Ok(permission)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Permission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! { "id": { "$in": ids.to_vec() } };
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let permissions: Vec<Permission> = cursor.try_collect().await?;
        Ok(permissions)
    }

    async fn find_all(&self) -> AppResult<Vec<Permission>> {
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let permissions: Vec<Permission> = cursor.try_collect().await?;
        Ok(permissions)
    }

    async fn update(&self, permission: Permission) -> AppResult<Permission> {
        let result = self
            .collection
            .replace_one(doc! { "id": permission.id }, &permission)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Permission with id '{}' not found",
                permission.id
            )));
        }

        Ok(permission)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        for field in ["id", "name"] {
            let options = IndexOptions::builder().unique(true).build();
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(options)
                .build();
            self.collection.create_index(model).await?;
        }
        log::info!("Ensured unique indexes on permissions.id and permissions.name");

        Ok(())
    }
}
