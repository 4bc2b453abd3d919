use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, instrument};

use super::core::{decode_time, encode_time, Database};
use crate::TARGET_DB;

/// An article row as persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredArticle {
    pub id: i64,
    pub source_id: i64,
    pub cluster_id: i64,
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StoredArticle {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let published_at: String = row.get("published_at");
        let created_at: String = row.get("created_at");

        Ok(Self {
            id: row.get("id"),
            source_id: row.get("source_id"),
            cluster_id: row.get("cluster_id"),
            url: row.get("url"),
            title: row.get("title"),
            summary: row.get("summary"),
            image: row.get("image"),
            published_at: decode_time(&published_at)?,
            created_at: decode_time(&created_at)?,
        })
    }
}

/// The slice of an article the scorers need.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateArticle {
    pub article_id: i64,
    pub cluster_id: i64,
    pub title: String,
    pub summary: Option<String>,
}

/// Fields written by an upsert. `created_at` only applies to a fresh insert.
#[derive(Debug, Clone, Copy)]
pub struct ArticleWrite<'a> {
    pub source_id: i64,
    pub cluster_id: i64,
    pub url: &'a str,
    pub title: &'a str,
    pub summary: Option<&'a str>,
    pub image: Option<&'a str>,
    pub published_at: &'a DateTime<Utc>,
    pub created_at: &'a DateTime<Utc>,
}

impl Database {
    /// Every article ingested at or after `since`, oldest id first.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn fetch_articles_since(
        &self,
        since: &DateTime<Utc>,
    ) -> Result<Vec<CandidateArticle>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, cluster_id, title, summary
            FROM articles
            WHERE created_at >= ?1
            ORDER BY id ASC
            "#,
        )
        .bind(encode_time(since))
        .fetch_all(self.pool())
        .await?;

        let candidates: Vec<CandidateArticle> = rows
            .iter()
            .map(|row| CandidateArticle {
                article_id: row.get("id"),
                cluster_id: row.get("cluster_id"),
                title: row.get("title"),
                summary: row.get("summary"),
            })
            .collect();

        debug!(target: TARGET_DB, "Fetched {} articles ingested since {}", candidates.len(), since);
        Ok(candidates)
    }

    pub async fn get_article(&self, article_id: i64) -> Result<Option<StoredArticle>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?1")
            .bind(article_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(StoredArticle::from_row).transpose()
    }

    pub async fn get_article_by_url(
        &self,
        source_id: i64,
        url: &str,
    ) -> Result<Option<StoredArticle>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM articles WHERE source_id = ?1 AND url = ?2")
            .bind(source_id)
            .bind(url)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(StoredArticle::from_row).transpose()
    }

    /// Articles of one story, newest publication first.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn list_cluster_articles(
        &self,
        cluster_id: i64,
    ) -> Result<Vec<StoredArticle>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT *
            FROM articles
            WHERE cluster_id = ?1
            ORDER BY published_at DESC, id DESC
            "#,
        )
        .bind(cluster_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(StoredArticle::from_row).collect()
    }

    pub async fn count_articles(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(self.pool())
            .await
    }
}

/// Inserts the article or, when `(source_id, url)` already exists, moves it to
/// `cluster_id` and merges in the non-null new fields. Returns the article id.
///
/// Runs on the caller's connection so it can share a transaction with the
/// cluster write.
pub(crate) async fn upsert_article(
    conn: &mut SqliteConnection,
    article: &ArticleWrite<'_>,
) -> Result<i64, sqlx::Error> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO articles (source_id, cluster_id, url, title, summary, image, published_at, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(source_id, url) DO UPDATE SET
            cluster_id = excluded.cluster_id,
            title = COALESCE(excluded.title, articles.title),
            summary = COALESCE(excluded.summary, articles.summary),
            image = COALESCE(excluded.image, articles.image),
            published_at = COALESCE(excluded.published_at, articles.published_at)
        RETURNING id
        "#,
    )
    .bind(article.source_id)
    .bind(article.cluster_id)
    .bind(article.url)
    .bind(article.title)
    .bind(article.summary)
    .bind(article.image)
    .bind(encode_time(article.published_at))
    .bind(encode_time(article.created_at))
    .fetch_one(&mut *conn)
    .await?;

    debug!(target: TARGET_DB, "Article {} upserted into cluster {}: {}", id, article.cluster_id, article.url);
    Ok(id)
}
