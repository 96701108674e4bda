//! Database queries for archived calculations.
//!
//! Calculations are stored as JSONB documents, one table shared by both
//! markets and partitioned by collection name.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Create the record table if it does not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS calculation_records (
            collection  TEXT        NOT NULL,
            id          TEXT        NOT NULL,
            recorded_at TIMESTAMPTZ NOT NULL,
            document    JSONB       NOT NULL,
            PRIMARY KEY (collection, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS calculation_records_recent
            ON calculation_records (collection, recorded_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a calculation document
pub async fn insert_record(
    pool: &PgPool,
    collection: &str,
    id: &str,
    recorded_at: DateTime<Utc>,
    document: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO calculation_records (collection, id, recorded_at, document)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(recorded_at)
    .bind(document)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent documents in a collection, newest first
pub async fn get_recent_records(
    pool: &PgPool,
    collection: &str,
    limit: i64,
) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let documents = sqlx::query_scalar::<_, serde_json::Value>(
        r#"
        SELECT document
        FROM calculation_records
        WHERE collection = $1
        ORDER BY recorded_at DESC
        LIMIT $2
        "#,
    )
    .bind(collection)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(documents)
}

/// Delete documents by id, returning the number removed
pub async fn delete_records(
    pool: &PgPool,
    collection: &str,
    ids: &[String],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM calculation_records
        WHERE collection = $1
          AND id = ANY($2)
        "#,
    )
    .bind(collection)
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
