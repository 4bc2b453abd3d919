use thiserror::Error;

use super::language::Language;
use super::normalizer::Tokenizer;
use super::rank::{cover_density_rank, TextQuery, TextVector};
use super::trigram::{trigram_similarity, TrigramSet};

/// A lexical similarity signal between two texts.
///
/// `text_a` is the incoming article, `text_b` the stored candidate. The
/// result is non-negative; its upper bound depends on the signal.
pub trait SimilarityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, text_a: &str, text_b: &str) -> f64;

    /// Fixes `text_a` so it is processed once and then scored against many
    /// candidates. The default keeps the text and defers to `score`.
    fn prepare<'a>(&'a self, text_a: &str) -> Box<dyn PreparedScorer + 'a> {
        Box::new(Deferred {
            scorer: self,
            text_a: text_a.to_string(),
        })
    }
}

/// A scorer with the incoming side already fixed.
pub trait PreparedScorer {
    fn score(&self, text_b: &str) -> f64;
}

struct Deferred<'a, S: ?Sized> {
    scorer: &'a S,
    text_a: String,
}

impl<S: SimilarityScorer + ?Sized> PreparedScorer for Deferred<'_, S> {
    fn score(&self, text_b: &str) -> f64 {
        self.scorer.score(&self.text_a, text_b)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("full-text scoring unavailable for '{language}': {reason}")]
pub struct ScoringUnavailable {
    pub language: String,
    pub reason: String,
}

/// Builds the two signals a resolution call needs.
pub trait ScorerFactory: Send + Sync {
    fn trigram(&self) -> Box<dyn SimilarityScorer>;

    /// An `Err` puts the call into trigram-only mode.
    fn full_text(&self, language: Language) -> Result<Box<dyn SimilarityScorer>, ScoringUnavailable>;
}

/// Character trigram similarity in [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigramScorer;

impl SimilarityScorer for TrigramScorer {
    fn name(&self) -> &'static str {
        "trigram"
    }

    fn score(&self, text_a: &str, text_b: &str) -> f64 {
        trigram_similarity(text_a, text_b)
    }

    fn prepare<'a>(&'a self, text_a: &str) -> Box<dyn PreparedScorer + 'a> {
        Box::new(PreparedTrigram {
            grams: TrigramSet::new(text_a),
        })
    }
}

struct PreparedTrigram {
    grams: TrigramSet,
}

impl PreparedScorer for PreparedTrigram {
    fn score(&self, text_b: &str) -> f64 {
        self.grams.similarity(&TrigramSet::new(text_b))
    }
}

/// Cover-density rank of `text_b` for a query made of `text_a`.
pub struct FullTextScorer {
    tokenizer: Tokenizer,
}

impl FullTextScorer {
    pub fn new(language: Language) -> Self {
        Self {
            tokenizer: Tokenizer::new(language),
        }
    }

    pub fn language(&self) -> Language {
        self.tokenizer.language()
    }
}

impl SimilarityScorer for FullTextScorer {
    fn name(&self) -> &'static str {
        "full_text"
    }

    fn score(&self, text_a: &str, text_b: &str) -> f64 {
        self.prepare(text_a).score(text_b)
    }

    fn prepare<'a>(&'a self, text_a: &str) -> Box<dyn PreparedScorer + 'a> {
        Box::new(PreparedFullText {
            tokenizer: &self.tokenizer,
            query: TextQuery::new(&self.tokenizer, text_a),
        })
    }
}

struct PreparedFullText<'a> {
    tokenizer: &'a Tokenizer,
    query: TextQuery,
}

impl PreparedScorer for PreparedFullText<'_> {
    fn score(&self, text_b: &str) -> f64 {
        if self.query.is_empty() {
            return 0.0;
        }
        cover_density_rank(&TextVector::new(self.tokenizer, text_b), &self.query)
    }
}

/// The built-in trigram and cover-density scorers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorerFactory;

impl ScorerFactory for LexicalScorerFactory {
    fn trigram(&self) -> Box<dyn SimilarityScorer> {
        Box::new(TrigramScorer)
    }

    fn full_text(&self, language: Language) -> Result<Box<dyn SimilarityScorer>, ScoringUnavailable> {
        Ok(Box::new(FullTextScorer::new(language)))
    }
}
