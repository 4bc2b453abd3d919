use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, instrument};

use super::core::{decode_time, encode_time, Database};
use crate::TARGET_DB;

/// A story row as persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCluster {
    pub id: i64,
    pub first_published_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub language: String,
    pub weight: i64,
}

impl StoredCluster {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let first_published_at: String = row.get("first_published_at");
        let last_updated_at: String = row.get("last_updated_at");

        Ok(Self {
            id: row.get("id"),
            first_published_at: decode_time(&first_published_at)?,
            last_updated_at: decode_time(&last_updated_at)?,
            language: row.get("language"),
            weight: row.get("weight"),
        })
    }
}

/// A story with the number of articles currently assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterOverview {
    pub cluster: StoredCluster,
    pub article_count: i64,
}

impl Database {
    pub async fn get_cluster(&self, cluster_id: i64) -> Result<Option<StoredCluster>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM clusters WHERE id = ?1")
            .bind(cluster_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(StoredCluster::from_row).transpose()
    }

    /// Most recently updated stories first.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn list_recent_clusters(&self, limit: i64) -> Result<Vec<ClusterOverview>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.*, COUNT(a.id) AS article_count
            FROM clusters c
            LEFT JOIN articles a ON a.cluster_id = c.id
            GROUP BY c.id
            ORDER BY c.last_updated_at DESC, c.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ClusterOverview {
                    cluster: StoredCluster::from_row(row)?,
                    article_count: row.get("article_count"),
                })
            })
            .collect()
    }

    pub async fn count_clusters(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clusters")
            .fetch_one(self.pool())
            .await
    }
}

/// Creates a story seeded by its first article. Weight starts at zero; only
/// the telemetry side changes it afterwards.
pub(crate) async fn insert_cluster(
    conn: &mut SqliteConnection,
    first_published_at: &DateTime<Utc>,
    created_at: &DateTime<Utc>,
    language: &str,
) -> Result<i64, sqlx::Error> {
    let cluster_id = sqlx::query(
        r#"
        INSERT INTO clusters (first_published_at, last_updated_at, language, weight)
        VALUES (?1, ?2, ?3, 0)
        "#,
    )
    .bind(encode_time(first_published_at))
    .bind(encode_time(created_at))
    .bind(language)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(target: TARGET_DB, "Created cluster {} (language: {})", cluster_id, language);
    Ok(cluster_id)
}

/// Moves `last_updated_at` forward to `updated_at`, never backwards.
/// Fails with `RowNotFound` if the story no longer exists.
pub(crate) async fn touch_cluster(
    conn: &mut SqliteConnection,
    cluster_id: i64,
    updated_at: &DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE clusters
        SET last_updated_at = MAX(last_updated_at, ?2)
        WHERE id = ?1
        "#,
    )
    .bind(cluster_id)
    .bind(encode_time(updated_at))
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    Ok(())
}
