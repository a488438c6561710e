pub mod quiz_cache;
pub mod store;

pub use quiz_cache::{quiz_key, QuizCache, QUIZ_LIST_KEY, QUIZ_LIST_TTL_SECS, QUIZ_TTL_SECS};
pub use store::{CacheStore, RedisCacheStore};
