use super::types::{ClusterScore, NormalizedCandidate};
use crate::config::ResolveOptions;

/// How crowded the field is this round, measured before any filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateStats {
    pub cluster_count: usize,
    pub max_full_text: f64,
}

impl CandidateStats {
    pub fn from_scores(scores: &[ClusterScore]) -> Self {
        Self {
            cluster_count: scores.len(),
            max_full_text: scores
                .iter()
                .map(|score| score.full_text_raw)
                .fold(0.0, f64::max),
        }
    }

    /// Raw full-text scores are only rescaled against the round's best when
    /// enough stories compete; a lone candidate would otherwise always get 1.0.
    pub fn normalizes(&self, options: &ResolveOptions) -> bool {
        self.cluster_count >= options.min_candidates && self.max_full_text > 0.0
    }

    pub fn normalize(&self, raw: f64, options: &ResolveOptions) -> f64 {
        if self.normalizes(options) {
            raw / self.max_full_text
        } else {
            0.0
        }
    }
}

/// Either signal on its own can keep a story in contention.
pub fn passes_floor(score: &ClusterScore, options: &ResolveOptions) -> bool {
    score.trigram >= options.min_trgm || score.full_text_raw >= options.min_ts
}

/// Normalizes every story's full-text signal and drops those below both floors.
pub fn normalize_and_filter(
    scores: &[ClusterScore],
    stats: &CandidateStats,
    options: &ResolveOptions,
) -> Vec<NormalizedCandidate> {
    scores
        .iter()
        .filter(|score| passes_floor(score, options))
        .map(|score| NormalizedCandidate {
            cluster_id: score.cluster_id,
            trigram: score.trigram,
            full_text_raw: score.full_text_raw,
            full_text_normalized: stats.normalize(score.full_text_raw, options),
        })
        .collect()
}
