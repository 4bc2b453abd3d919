use tracing::info;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            -- Stories: groups of articles about the same event
            CREATE TABLE IF NOT EXISTS clusters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_published_at TEXT NOT NULL,
                last_updated_at TEXT NOT NULL,
                language TEXT NOT NULL,
                weight INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_clusters_first_published_at ON clusters (first_published_at);
            CREATE INDEX IF NOT EXISTS idx_clusters_last_updated_at ON clusters (last_updated_at);
            CREATE INDEX IF NOT EXISTS idx_clusters_weight ON clusters (weight);

            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id INTEGER NOT NULL,
                cluster_id INTEGER NOT NULL,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                summary TEXT,
                image TEXT,
                published_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (source_id, url),
                FOREIGN KEY (cluster_id) REFERENCES clusters (id) ON DELETE CASCADE
            );
            -- Candidate retrieval scans the recency window on ingestion time
            CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles (created_at);
            CREATE INDEX IF NOT EXISTS idx_articles_cluster_id ON articles (cluster_id);
            CREATE INDEX IF NOT EXISTS idx_articles_cluster_published ON articles (cluster_id, published_at);
            "#,
        )
        .execute(&mut *conn)
        .await?;
        info!(target: TARGET_DB, "Tables ensured to exist");

        Ok(())
    }
}
