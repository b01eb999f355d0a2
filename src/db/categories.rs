use crate::{error::Error, model::Topics};

use super::{
    DocumentStore, Stored,
    collections::{CATEGORIES, TOPICS_ID},
    fetch_optional, modify_or_default,
};

#[tracing::instrument(name = "get categories", skip_all)]
pub async fn get_topics(store: &dyn DocumentStore) -> Result<Topics, Error> {
    Ok(fetch_optional::<Topics>(store, CATEGORIES, TOPICS_ID)
        .await?
        .map(|stored| stored.data)
        .unwrap_or_default())
}

#[tracing::instrument(name = "add category", skip(store))]
pub async fn add_category(
    store: &dyn DocumentStore,
    category: &str,
) -> Result<(Stored<Topics>, String), Error> {
    modify_or_default(store, CATEGORIES, TOPICS_ID, |topics: &mut Topics| {
        Ok(topics.add(category)?)
    })
    .await
}

#[tracing::instrument(name = "delete category", skip(store))]
pub async fn delete_category(
    store: &dyn DocumentStore,
    index: usize,
) -> Result<(Stored<Topics>, String), Error> {
    modify_or_default(store, CATEGORIES, TOPICS_ID, |topics: &mut Topics| {
        Ok(topics.remove(index)?)
    })
    .await
}
