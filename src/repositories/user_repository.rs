use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{Database, Sequences},
    errors::{AppError, AppResult},
    models::domain::{NewUser, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    /// Matches either field; used for the uniqueness pre-check at registration.
    async fn find_by_username_or_email(&self, username: &str, email: &str)
        -> AppResult<Option<User>>;
    async fn update_roles(&self, id: i64, role_ids: &[i64]) -> AppResult<User>;
    /// Strips a deleted role from every user that still references it.
    async fn remove_role_from_all(&self, role_id: i64) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
    sequences: Sequences,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("users"),
            sequences: Sequences::new(db),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let id = self.sequences.next_id("users").await?;
        let user = User::new(id, user.username, user.email, user.password_hash);
        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        let filter = doc! {
            "$or": [
                { "username": username },
                { "email": email },
            ]
        };
        let user = self.collection.find_one(filter).await?;
        Ok(user)
    }

    async fn update_roles(&self, id: i64, role_ids: &[i64]) -> AppResult<User> {
        let update = doc! { "$set": { "role_ids": role_ids.to_vec() } };

        let user = self
            .collection
            .find_one_and_update(doc! { "id": id }, update)
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?;

        user.ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    async fn remove_role_from_all(&self, role_id: i64) -> AppResult<()> {
        self.collection
            .update_many(doc! {}, doc! { "$pull": { "role_ids": role_id } })
            .await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        for field in ["id", "username", "email"] {
            let options = IndexOptions::builder().unique(true).build();
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(options)
                .build();
            self.collection.create_index(model).await?;
        }
        log::info!("Ensured unique indexes on users.id, users.username and users.email");

        Ok(())
    }
}
