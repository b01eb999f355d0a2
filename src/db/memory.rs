use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Precondition, apply_increment, error::DatabaseError};

struct Entry {
    sequence: u64,
    document: Document,
}

#[derive(Default)]
struct Inner {
    sequence: u64,
    collections: HashMap<String, HashMap<String, Entry>>,
}

/// Process-local store used by tests and by the `memory` backend.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DatabaseError> {
        let inner = self.inner.read().await;

        Ok(inner
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|entry| entry.document.clone()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DatabaseError> {
        let inner = self.inner.read().await;

        let mut entries: Vec<&Entry> = match inner.collections.get(collection) {
            Some(documents) => documents.values().collect(),
            None => return Ok(Vec::new()),
        };
        entries.sort_by_key(|entry| (entry.document.created_at, entry.sequence));

        Ok(entries
            .into_iter()
            .map(|entry| entry.document.clone())
            .collect())
    }

    async fn put(
        &self,
        collection: &str,
        id: &str,
        data: serde_json::Value,
        precondition: Precondition,
    ) -> Result<Document, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.sequence += 1;
        let sequence = inner.sequence;

        let documents = inner.collections.entry(collection.to_string()).or_default();
        let now = Utc::now();

        if let Some(entry) = documents.get_mut(id) {
            return match precondition {
                Precondition::Absent => Err(DatabaseError::AlreadyExists),
                Precondition::Version(expected) if entry.document.version != expected => {
                    Err(DatabaseError::VersionConflict {
                        expected,
                        actual: entry.document.version,
                    })
                }
                _ => {
                    entry.document.data = data;
                    entry.document.version += 1;
                    entry.document.updated_at = now;
                    Ok(entry.document.clone())
                }
            };
        }

        if let Precondition::Version(_) = precondition {
            return Err(DatabaseError::NotFound);
        }

        let document = Document {
            id: id.to_string(),
            version: 1,
            data,
            created_at: now,
            updated_at: now,
        };
        documents.insert(
            id.to_string(),
            Entry {
                sequence,
                document: document.clone(),
            },
        );

        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;

        Ok(inner
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        guards: &[(&str, &str)],
        pointers: &[String],
        by: i64,
    ) -> Result<Document, DatabaseError> {
        let mut inner = self.inner.write().await;

        let entry = inner
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or(DatabaseError::NotFound)?;

        let mut data = entry.document.data.clone();
        apply_increment(&mut data, guards, pointers, by)?;

        entry.document.data = data;
        entry.document.version += 1;
        entry.document.updated_at = Utc::now();

        Ok(entry.document.clone())
    }

    async fn count(&self, collection: &str) -> Result<i64, DatabaseError> {
        let inner = self.inner.read().await;

        Ok(inner
            .collections
            .get(collection)
            .map(|documents| documents.len() as i64)
            .unwrap_or(0))
    }
}
