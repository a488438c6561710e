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
    models::domain::{NewRole, Role},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn insert(&self, role: NewRole) -> AppResult<Role>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;
    /// Fetches the subset of `ids` that exist, ordered by id. Unknown ids are
    /// silently skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>>;
    async fn find_all(&self) -> AppResult<Vec<Role>>;
    async fn update(&self, role: Role) -> AppResult<Role>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    /// Strips a deleted permission from every role that still references it.
    async fn remove_permission_from_all(&self, permission_id: i64) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoRoleRepository {
    collection: Collection<Role>,
    sequences: Sequences,
}

impl MongoRoleRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("roles"),
            sequences: Sequences::new(db),
        }
    }
}

#[async_trait]
impl RoleRepository for MongoRoleRepository {
    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        let role = Role {
            id: self.sequences.next_id("roles").await?,
            name: role.name,
            description: role.description,
            permission_ids: role.permission_ids,
        };
        self.collection.insert_one(&role).await?;
        Ok(role)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        let role = self.collection.find_one(doc! { "id": id }).await?;
        Ok(role)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! { "id": { "$in": ids.to_vec() } };
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let roles: Vec<Role> = cursor.try_collect().await?;
        Ok(roles)
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let roles: Vec<Role> = cursor.try_collect().await?;
        Ok(roles)
    }

    async fn update(&self, role: Role) -> AppResult<Role> {
        let result = self
            .collection
            .replace_one(doc! { "id": role.id }, &role)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Role with id '{}' not found",
                role.id
            )));
        }

        Ok(role)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn remove_permission_from_all(&self, permission_id: i64) -> AppResult<()> {
        self.collection
            .update_many(doc! {}, doc! { "$pull": { "permission_ids": permission_id } })
            .await?;
        Ok(())
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
        log::info!("Ensured unique indexes on roles.id and roles.name");

        Ok(())
    }
}
