use chrono::{DateTime, Utc};
use tracing::debug;

use super::types::{Decision, DecisionResult, IncomingArticle};
use crate::db::article::{upsert_article, ArticleWrite};
use crate::db::cluster::{insert_cluster, touch_cluster};
use crate::db::Database;
use crate::TARGET_CLUSTERING;

/// Writes a decision: creates or touches the story, then upserts the article,
/// all in one transaction.
///
/// Every path starts the transaction with a write, so SQLite takes the writer
/// lock up front and concurrent callers queue on the busy timeout instead of
/// failing a read-to-write upgrade. Dropping the transaction on error rolls
/// everything back; a story is never left without its article.
pub async fn persist_decision(
    db: &Database,
    article: &IncomingArticle,
    published_at: &DateTime<Utc>,
    ingested_at: &DateTime<Utc>,
    language: &str,
    decision: &Decision,
) -> Result<DecisionResult, sqlx::Error> {
    let mut transaction = db.pool().begin().await?;

    let cluster_id = match decision {
        Decision::Match { cluster_id, .. } => {
            touch_cluster(&mut *transaction, *cluster_id, ingested_at).await?;
            *cluster_id
        }
        Decision::New { .. } => {
            insert_cluster(&mut *transaction, published_at, ingested_at, language).await?
        }
    };

    let write = ArticleWrite {
        source_id: article.source_id,
        cluster_id,
        url: article.url.trim(),
        title: article.title.trim(),
        summary: article.summary(),
        image: article.image(),
        published_at,
        created_at: ingested_at,
    };
    let article_id = upsert_article(&mut *transaction, &write).await?;

    transaction.commit().await?;

    debug!(
        target: TARGET_CLUSTERING,
        "Committed article {} in cluster {}", article_id, cluster_id
    );

    Ok(DecisionResult {
        cluster_id,
        article_id,
        score: decision.score(),
        matched: decision.is_match(),
        created_new: !decision.is_match(),
    })
}
