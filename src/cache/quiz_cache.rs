use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    cache::store::CacheStore,
    errors::{AppError, AppResult},
    models::domain::Quiz,
    repositories::QuizRepository,
};

pub const QUIZ_LIST_KEY: &str = "quizzes";
/// The list is invalidated on create but not on every write, so it gets a
/// short lease.
pub const QUIZ_LIST_TTL_SECS: u64 = 30;
/// Single-quiz trees are deleted explicitly and can live much longer.
pub const QUIZ_TTL_SECS: u64 = 3600;

pub fn quiz_key(id: i64) -> String {
    format!("quiz:{}", id)
}

/// Read-through cache in front of the quiz repository.
///
/// Reads hit Redis first and fall back to the store, writing what they found
/// back with the appropriate TTL. Invalidation is the caller's duty via the
/// `invalidate_on_*` hooks; anything not covered by those simply ages out.
#[derive(Clone)]
pub struct QuizCache {
    store: Arc<dyn CacheStore>,
    repository: Arc<dyn QuizRepository>,
}

impl QuizCache {
    pub fn new(store: Arc<dyn CacheStore>, repository: Arc<dyn QuizRepository>) -> Self {
        Self { store, repository }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Quiz>> {
        if let Some(cached) = self.store.get(QUIZ_LIST_KEY).await? {
            log::debug!("Cache hit for '{}'", QUIZ_LIST_KEY);
            return decode(QUIZ_LIST_KEY, &cached);
        }

        log::debug!("Cache miss for '{}'", QUIZ_LIST_KEY);
        let quizzes = self.repository.find_all().await?;
        self.store
            .set_with_expiry(QUIZ_LIST_KEY, &encode(QUIZ_LIST_KEY, &quizzes)?, QUIZ_LIST_TTL_SECS)
            .await?;

        Ok(quizzes)
    }

    /// An absent quiz is not cached; every read for a missing id goes to the
    /// store.
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let key = quiz_key(id);
        if let Some(cached) = self.store.get(&key).await? {
            log::debug!("Cache hit for '{}'", key);
            return Ok(Some(decode(&key, &cached)?));
        }

        log::debug!("Cache miss for '{}'", key);
        let quiz = self.repository.find_by_id(id).await?;
        if let Some(ref quiz) = quiz {
            self.store
                .set_with_expiry(&key, &encode(&key, quiz)?, QUIZ_TTL_SECS)
                .await?;
        }

        Ok(quiz)
    }

    /// A new quiz changes the list but no existing tree, so only the list
    /// entry is dropped.
    pub async fn invalidate_on_create(&self) -> AppResult<()> {
        self.store.delete(QUIZ_LIST_KEY).await
    }

    pub async fn invalidate_on_delete(&self, id: i64) -> AppResult<()> {
        self.store.delete(&quiz_key(id)).await?;
        self.store.delete(QUIZ_LIST_KEY).await
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::CacheError(format!("Failed to serialize cache entry '{}': {}", key, e)))
}

fn decode<T: DeserializeOwned>(key: &str, payload: &str) -> AppResult<T> {
    serde_json::from_str(payload)
        .map_err(|e| AppError::CacheError(format!("Failed to deserialize cache entry '{}': {}", key, e)))
}
