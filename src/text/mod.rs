pub mod language;
pub mod normalizer;
pub mod rank;
pub mod scorer;
pub mod stopwords;
pub mod trigram;

pub use language::{Language, ResolvedLanguage, UnknownLanguage};
pub use scorer::{
    FullTextScorer, LexicalScorerFactory, PreparedScorer, ScorerFactory, ScoringUnavailable,
    SimilarityScorer, TrigramScorer,
};
pub use trigram::{trigram_similarity, TrigramSet};

pub use crate::TARGET_TEXT;
