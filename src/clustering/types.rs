use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ResolveError;

/// A news item handed over by an ingestion pipeline (RSS, Telegram, JSON feed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingArticle {
    pub source_id: i64,
    pub url: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub image: Option<String>,
    /// Text search configuration (`russian`, `en`, `auto`, ...). Blank means the default.
    #[serde(default)]
    pub language: String,
    /// When the item entered the system. Defaults to the time of the call.
    pub ingested_at: Option<DateTime<Utc>>,
}

impl IncomingArticle {
    pub fn new(source_id: i64, url: &str, title: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            source_id,
            url: url.to_string(),
            title: title.to_string(),
            published_at: Some(published_at),
            summary: None,
            image: None,
            language: String::new(),
            ingested_at: None,
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn ingested_at(mut self, ingested_at: DateTime<Utc>) -> Self {
        self.ingested_at = Some(ingested_at);
        self
    }

    /// Summary with blank values treated as absent.
    pub fn summary(&self) -> Option<&str> {
        non_blank(self.summary.as_deref())
    }

    /// Image with blank values treated as absent.
    pub fn image(&self) -> Option<&str> {
        non_blank(self.image.as_deref())
    }

    /// Checks the required fields and returns the publish time.
    pub fn validate(&self) -> Result<DateTime<Utc>, ResolveError> {
        if self.source_id <= 0 {
            return Err(ResolveError::Validation(format!(
                "source_id must be positive, got {}",
                self.source_id
            )));
        }
        if self.url.trim().is_empty() {
            return Err(ResolveError::Validation("url is required".to_string()));
        }
        if let Err(e) = Url::parse(self.url.trim()) {
            return Err(ResolveError::Validation(format!(
                "url '{}' is not valid: {}",
                self.url, e
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ResolveError::Validation("title is required".to_string()));
        }
        self.published_at
            .ok_or_else(|| ResolveError::Validation("published_at is required".to_string()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// The text of an article as the scorers see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticleText<'a> {
    pub title: &'a str,
    pub summary: Option<&'a str>,
}

impl<'a> ArticleText<'a> {
    pub fn new(title: &'a str, summary: Option<&'a str>) -> Self {
        Self { title, summary }
    }

    /// Title and summary joined by a blank, as fed to the full-text signal.
    pub fn combined(&self) -> String {
        format!("{} {}", self.title, self.summary.unwrap_or_default())
    }
}

/// Best signals of one story against the incoming article: the maximum over
/// its member articles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterScore {
    pub cluster_id: i64,
    pub trigram: f64,
    pub full_text_raw: f64,
}

/// A story that cleared the floors, with its normalized full-text signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedCandidate {
    pub cluster_id: i64,
    pub trigram: f64,
    pub full_text_raw: f64,
    pub full_text_normalized: f64,
}

/// What the policy chose for the incoming article.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Join an existing story.
    Match { cluster_id: i64, score: f64 },
    /// Seed a new story. `best_score` is the best surviving candidate, if any.
    New { best_score: Option<f64> },
}

impl Decision {
    pub fn score(&self) -> f64 {
        match self {
            Decision::Match { score, .. } => *score,
            Decision::New { best_score } => best_score.unwrap_or(0.0),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Decision::Match { .. })
    }
}

/// Returned to the caller of a resolution; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionResult {
    pub cluster_id: i64,
    pub article_id: i64,
    pub score: f64,
    pub matched: bool,
    pub created_new: bool,
}
