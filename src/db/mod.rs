use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Error;

use self::error::DatabaseError;

pub mod app_errors;
pub mod books;
pub mod categories;
pub mod club;
pub mod collections;
pub mod error;
pub mod memory;
pub mod notifications;
pub mod postgres;
pub mod series;
pub mod site_content;
pub mod stats;
pub mod users;

/// A raw document as held by a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub version: i64,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requirement a write must satisfy against the currently stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Create or overwrite.
    Any,
    /// Create only; fails with [`DatabaseError::AlreadyExists`].
    Absent,
    /// Replace only when the stored version matches.
    Version(i64),
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DatabaseError>;

    /// Documents of a collection, oldest first.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DatabaseError>;

    async fn put(
        &self,
        collection: &str,
        id: &str,
        data: serde_json::Value,
        precondition: Precondition,
    ) -> Result<Document, DatabaseError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DatabaseError>;

    /// Adds `by` to the integer fields at `pointers` (JSON pointers) in a single
    /// atomic step, provided every `(field, value)` guard matches a top-level
    /// string field. A missing document or failed guard is `NotFound`.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        guards: &[(&str, &str)],
        pointers: &[String],
        by: i64,
    ) -> Result<Document, DatabaseError>;

    async fn count(&self, collection: &str) -> Result<i64, DatabaseError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// In-place body of [`DocumentStore::increment`], shared by the backends.
pub(crate) fn apply_increment(
    data: &mut serde_json::Value,
    guards: &[(&str, &str)],
    pointers: &[String],
    by: i64,
) -> Result<(), DatabaseError> {
    let guarded = guards
        .iter()
        .all(|(field, value)| data.get(*field).and_then(|v| v.as_str()) == Some(*value));
    if !guarded {
        return Err(DatabaseError::NotFound);
    }

    for pointer in pointers {
        let counter = data.pointer_mut(pointer).ok_or(DatabaseError::NotFound)?;
        *counter = serde_json::Value::from(counter.as_i64().unwrap_or(0) + by);
    }

    Ok(())
}

/// A typed document together with its store metadata.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub id: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

fn decode<T: DeserializeOwned>(collection: &str, document: Document) -> Result<Stored<T>, Error> {
    let data = serde_json::from_value(document.data).map_err(|source| DatabaseError::Malformed {
        collection: collection.to_string(),
        id: document.id.clone(),
        source,
    })?;

    Ok(Stored {
        id: document.id,
        version: document.version,
        created_at: document.created_at,
        updated_at: document.updated_at,
        data,
    })
}

fn encode<T: Serialize>(data: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(data).map_err(|e| Error::Other(e.into()))
}

pub async fn fetch_optional<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<Stored<T>>, Error> {
    match store.get(collection, id).await? {
        Some(document) => Ok(Some(decode(collection, document)?)),
        None => Ok(None),
    }
}

pub async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Stored<T>, Error> {
    fetch_optional(store, collection, id)
        .await?
        .ok_or(Error::Database(DatabaseError::NotFound))
}

pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<Stored<T>>, Error> {
    store
        .list(collection)
        .await?
        .into_iter()
        .map(|document| decode(collection, document))
        .collect()
}

pub async fn write<T: Serialize + DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    data: &T,
    precondition: Precondition,
) -> Result<Stored<T>, Error> {
    let document = store
        .put(collection, id, encode(data)?, precondition)
        .await?;

    decode(collection, document)
}

/// Stores `data` under a freshly generated id.
pub async fn insert<T: Serialize + DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    data: &T,
) -> Result<Stored<T>, Error> {
    let id = uuid::Uuid::new_v4().simple().to_string();
    write(store, collection, &id, data, Precondition::Absent).await
}

pub async fn remove(store: &dyn DocumentStore, collection: &str, id: &str) -> Result<(), Error> {
    if store.delete(collection, id).await? {
        Ok(())
    } else {
        Err(Error::Database(DatabaseError::NotFound))
    }
}

/// Rejects a write when the caller edited an older copy than the one just read.
pub fn ensure_version(expected: Option<i64>, actual: i64) -> Result<(), Error> {
    match expected {
        Some(expected) if expected != actual => Err(Error::Database(
            DatabaseError::VersionConflict { expected, actual },
        )),
        _ => Ok(()),
    }
}

/// Read-modify-write of one document, guarded by the version that was read.
pub async fn modify<T, R, F>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    expected_version: Option<i64>,
    f: F,
) -> Result<(Stored<T>, R), Error>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut T) -> Result<R, Error>,
{
    let Stored {
        version, mut data, ..
    } = fetch::<T>(store, collection, id).await?;
    ensure_version(expected_version, version)?;

    let outcome = f(&mut data)?;
    let stored = write(store, collection, id, &data, Precondition::Version(version)).await?;

    Ok((stored, outcome))
}

/// Like [`modify`] for singleton documents that start out as `T::default()`.
pub async fn modify_or_default<T, R, F>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    f: F,
) -> Result<(Stored<T>, R), Error>
where
    T: Serialize + DeserializeOwned + Default,
    F: FnOnce(&mut T) -> Result<R, Error>,
{
    let (mut data, precondition) = match fetch_optional::<T>(store, collection, id).await? {
        Some(stored) => (stored.data, Precondition::Version(stored.version)),
        None => (T::default(), Precondition::Absent),
    };

    let outcome = f(&mut data)?;
    let stored = write(store, collection, id, &data, precondition).await?;

    Ok((stored, outcome))
}

/// Typed wrapper over [`DocumentStore::increment`].
pub async fn increment<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    guards: &[(&str, &str)],
    pointers: &[String],
) -> Result<Stored<T>, Error> {
    let document = store.increment(collection, id, guards, pointers, 1).await?;

    decode(collection, document)
}

pub fn is_conflict(error: &Error) -> bool {
    matches!(
        error,
        Error::Database(DatabaseError::VersionConflict { .. } | DatabaseError::AlreadyExists)
    )
}

/// Reverses the oldest-first order of [`DocumentStore::list`].
pub fn newest_first<T>(mut documents: Vec<Stored<T>>) -> Vec<Stored<T>> {
    documents.reverse();
    documents
}
