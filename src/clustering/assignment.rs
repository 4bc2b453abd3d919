use chrono::Utc;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::aggregate::{normalize_and_filter, CandidateStats};
use super::decision::decide;
use super::persist::persist_decision;
use super::retrieval::retrieve_candidates;
use super::scoring::{score_candidates, Scorers};
use super::types::{ArticleText, Decision, DecisionResult, IncomingArticle};
use crate::config::ResolveOptions;
use crate::db::Database;
use crate::error::ResolveError;
use crate::text::{LexicalScorerFactory, ResolvedLanguage, ScorerFactory};
use crate::TARGET_CLUSTERING;

/// Decides which story an incoming article belongs to and stores it there.
///
/// Holds no state between calls besides the store handle and the scorer
/// factory; clones share both.
#[derive(Clone)]
pub struct StoryResolver {
    db: Database,
    scorers: Arc<dyn ScorerFactory>,
}

impl StoryResolver {
    pub fn new(db: Database) -> Self {
        Self::with_scorers(db, Arc::new(LexicalScorerFactory))
    }

    pub fn with_scorers(db: Database, scorers: Arc<dyn ScorerFactory>) -> Self {
        Self { db, scorers }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Assigns an article to the best matching story, or seeds a new one, and
    /// upserts the article under `(source_id, url)`.
    ///
    /// Steps: retrieve recent articles, score them, reduce to per-story
    /// maxima, normalize and filter, decide, persist. Calling twice with the
    /// same input leaves one article row; callers may retry any `Infra` error
    /// wholesale.
    #[instrument(
        target = "clustering",
        level = "info",
        skip(self, article, options),
        fields(source_id = article.source_id, url = %article.url)
    )]
    pub async fn resolve_and_store(
        &self,
        article: &IncomingArticle,
        options: &ResolveOptions,
    ) -> Result<DecisionResult, ResolveError> {
        options.validate()?;
        let published_at = article.validate()?;
        let ingested_at = article.ingested_at.unwrap_or_else(Utc::now);

        let text = ArticleText::new(article.title.trim(), article.summary());
        let language = ResolvedLanguage::resolve(&article.language, &text.combined());
        let scorers = self.scorers_for(&language);
        let options = if scorers.is_degraded() {
            Cow::Owned(ResolveOptions {
                w_ft: 0.0,
                ..options.clone()
            })
        } else {
            Cow::Borrowed(options)
        };

        let candidates = retrieve_candidates(&self.db, &ingested_at, options.recency_window).await?;
        let cluster_scores = score_candidates(&text, &candidates, &scorers);
        let stats = CandidateStats::from_scores(&cluster_scores);
        let survivors = normalize_and_filter(&cluster_scores, &stats, &options);
        let decision = decide(&survivors, &options);

        match decision {
            Decision::Match { cluster_id, score } => info!(
                target: TARGET_CLUSTERING,
                "Matched cluster {} (score: {:.4}, {} candidate clusters, {} survivors)",
                cluster_id,
                score,
                stats.cluster_count,
                survivors.len()
            ),
            Decision::New { best_score } => info!(
                target: TARGET_CLUSTERING,
                "Creating new cluster: best score {} below {:.2} ({} candidate clusters, {} survivors)",
                best_score.map_or("n/a".to_string(), |s| format!("{:.4}", s)),
                options.min_score,
                stats.cluster_count,
                survivors.len()
            ),
        }

        let result = persist_decision(
            &self.db,
            article,
            &published_at,
            &ingested_at,
            language.tag(),
            &decision,
        )
        .await?;

        Ok(result)
    }

    /// Trigram scoring always runs; full text needs a tokenizer for the
    /// language, and without one the call carries on trigram-only.
    fn scorers_for(&self, language: &ResolvedLanguage) -> Scorers {
        let full_text = match language {
            ResolvedLanguage::Known(language) => match self.scorers.full_text(*language) {
                Ok(scorer) => Some(scorer),
                Err(e) => {
                    warn!(target: TARGET_CLUSTERING, "Degraded to trigram-only scoring: {}", e);
                    None
                }
            },
            ResolvedLanguage::Unsupported(tag) => {
                warn!(
                    target: TARGET_CLUSTERING,
                    "Degraded to trigram-only scoring: no text search configuration for '{}'", tag
                );
                None
            }
        };

        Scorers {
            trigram: self.scorers.trigram(),
            full_text,
        }
    }
}
