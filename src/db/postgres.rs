use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::PgPool;

use super::{Document, DocumentStore, Precondition, apply_increment, error::DatabaseError};

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    version: i64,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            version: row.version,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, collection: &str, id: &str) -> Result<Option<i64>, DatabaseError> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT
                version
            FROM
                documents
            WHERE
                collection = $1 AND id = $2;
        "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(version)
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(name = "get document", skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DatabaseError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT
                id, version, data, created_at, updated_at
            FROM
                documents
            WHERE
                collection = $1 AND id = $2;
        "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    #[tracing::instrument(name = "list documents", skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DatabaseError> {
        let mut stream = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT
                id, version, data, created_at, updated_at
            FROM
                documents
            WHERE
                collection = $1
            ORDER BY created_at, id;
        "#,
        )
        .bind(collection)
        .fetch(&self.pool);

        let mut documents = Vec::new();
        while let Some(row) = stream.try_next().await? {
            documents.push(Document::from(row));
        }

        Ok(documents)
    }

    #[tracing::instrument(name = "put document", skip(self, data))]
    async fn put(
        &self,
        collection: &str,
        id: &str,
        data: serde_json::Value,
        precondition: Precondition,
    ) -> Result<Document, DatabaseError> {
        match precondition {
            Precondition::Any => {
                let row = sqlx::query_as::<_, DocumentRow>(
                    r#"
                    INSERT INTO documents
                        (collection, id, version, data, created_at, updated_at)
                    VALUES
                        ($1, $2, 1, $3, now(), now())
                    ON CONFLICT (collection, id)
                    DO UPDATE SET
                        data = EXCLUDED.data,
                        version = documents.version + 1,
                        updated_at = now()
                    RETURNING id, version, data, created_at, updated_at;
                "#,
                )
                .bind(collection)
                .bind(id)
                .bind(&data)
                .fetch_one(&self.pool)
                .await?;

                Ok(row.into())
            }
            Precondition::Absent => {
                let row = sqlx::query_as::<_, DocumentRow>(
                    r#"
                    INSERT INTO documents
                        (collection, id, version, data, created_at, updated_at)
                    VALUES
                        ($1, $2, 1, $3, now(), now())
                    ON CONFLICT (collection, id) DO NOTHING
                    RETURNING id, version, data, created_at, updated_at;
                "#,
                )
                .bind(collection)
                .bind(id)
                .bind(&data)
                .fetch_optional(&self.pool)
                .await?;

                row.map(Document::from).ok_or(DatabaseError::AlreadyExists)
            }
            Precondition::Version(expected) => {
                let row = sqlx::query_as::<_, DocumentRow>(
                    r#"
                    UPDATE documents
                    SET
                        data = $3,
                        version = version + 1,
                        updated_at = now()
                    WHERE
                        collection = $1 AND id = $2 AND version = $4
                    RETURNING id, version, data, created_at, updated_at;
                "#,
                )
                .bind(collection)
                .bind(id)
                .bind(&data)
                .bind(expected)
                .fetch_optional(&self.pool)
                .await?;

                match row {
                    Some(row) => Ok(row.into()),
                    None => match self.current_version(collection, id).await? {
                        Some(actual) => Err(DatabaseError::VersionConflict { expected, actual }),
                        None => Err(DatabaseError::NotFound),
                    },
                }
            }
        }
    }

    #[tracing::instrument(name = "delete document", skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE
                collection = $1 AND id = $2;
        "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The row lock taken by `FOR UPDATE` serializes concurrent increments.
    #[tracing::instrument(name = "increment document", skip(self, guards, pointers))]
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        guards: &[(&str, &str)],
        pointers: &[String],
        by: i64,
    ) -> Result<Document, DatabaseError> {
        let mut transaction = self.pool.begin().await?;

        let mut data = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT
                data
            FROM
                documents
            WHERE
                collection = $1 AND id = $2
            FOR UPDATE;
        "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        apply_increment(&mut data, guards, pointers, by)?;

        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET
                data = $3,
                version = version + 1,
                updated_at = now()
            WHERE
                collection = $1 AND id = $2
            RETURNING id, version, data, created_at, updated_at;
        "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(row.into())
    }

    #[tracing::instrument(name = "count documents", skip(self))]
    async fn count(&self, collection: &str) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT
                COUNT(*)
            FROM
                documents
            WHERE
                collection = $1;
        "#,
        )
        .bind(collection)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
