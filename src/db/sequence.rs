use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize, Serialize)]
struct Counter {
    #[serde(rename = "_id")]
    name: String,
    value: i64,
}

/// Monotonic integer id allocation backed by the `counters` collection.
///
/// Entity ids on the wire are plain integers, so every insert draws the next
/// value from a named counter via an atomic `$inc` upsert. Ids start at 1 and
/// are never reused.
#[derive(Clone)]
pub struct Sequences {
    counters: Collection<Counter>,
}

impl Sequences {
    pub fn new(db: &Database) -> Self {
        let counters = db.get_collection("counters");
        Self { counters }
    }

    pub async fn next_id(&self, sequence: &str) -> AppResult<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": sequence },
                doc! { "$inc": { "value": 1_i64 } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Counter '{}' missing after upsert",
                    sequence
                ))
            })?;

        Ok(counter.value)
    }
}
