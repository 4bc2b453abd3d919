use std::collections::BTreeMap;

use super::types::{ArticleText, ClusterScore};
use crate::db::CandidateArticle;
use crate::text::{PreparedScorer, SimilarityScorer};

/// The signals in force for one call. Without a full-text scorer every raw
/// full-text score is zero.
pub struct Scorers {
    pub trigram: Box<dyn SimilarityScorer>,
    pub full_text: Option<Box<dyn SimilarityScorer>>,
}

impl Scorers {
    pub fn is_degraded(&self) -> bool {
        self.full_text.is_none()
    }

    /// Processes the incoming article once for scoring against every candidate.
    pub fn prepare<'a>(&'a self, incoming: &ArticleText<'_>) -> PreparedScorers<'a> {
        PreparedScorers {
            title: self.trigram.prepare(incoming.title),
            summary: incoming.summary.map(|summary| self.trigram.prepare(summary)),
            full_text: self
                .full_text
                .as_ref()
                .map(|scorer| scorer.prepare(&incoming.combined())),
        }
    }
}

/// The incoming side of every signal, ready to score candidates.
pub struct PreparedScorers<'a> {
    title: Box<dyn PreparedScorer + 'a>,
    summary: Option<Box<dyn PreparedScorer + 'a>>,
    full_text: Option<Box<dyn PreparedScorer + 'a>>,
}

impl PreparedScorers<'_> {
    /// Title against title and summary against summary; the better of the two.
    /// A summary missing on either side is not compared.
    pub fn trigram(&self, candidate: &ArticleText<'_>) -> f64 {
        let title = self.title.score(candidate.title);
        match (&self.summary, candidate.summary) {
            (Some(summary), Some(b)) => title.max(summary.score(b)),
            _ => title,
        }
    }

    /// Rank of the candidate's combined text for a query made of the incoming one.
    pub fn full_text(&self, candidate: &ArticleText<'_>) -> f64 {
        match &self.full_text {
            Some(scorer) => scorer.score(&candidate.combined()),
            None => 0.0,
        }
    }
}

/// Scores every candidate article and keeps, per story, the best trigram and
/// the best raw full-text score. A story is as close as its closest article.
/// Output is ordered by cluster id.
pub fn score_candidates(
    incoming: &ArticleText<'_>,
    candidates: &[CandidateArticle],
    scorers: &Scorers,
) -> Vec<ClusterScore> {
    let prepared = scorers.prepare(incoming);
    let mut by_cluster: BTreeMap<i64, ClusterScore> = BTreeMap::new();

    for candidate in candidates {
        let text = ArticleText::new(&candidate.title, candidate.summary.as_deref());
        let trigram = prepared.trigram(&text);
        let full_text_raw = prepared.full_text(&text);

        let entry = by_cluster
            .entry(candidate.cluster_id)
            .or_insert(ClusterScore {
                cluster_id: candidate.cluster_id,
                trigram: 0.0,
                full_text_raw: 0.0,
            });
        entry.trigram = entry.trigram.max(trigram);
        entry.full_text_raw = entry.full_text_raw.max(full_text_raw);
    }

    by_cluster.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FullTextScorer, Language, TrigramScorer};

    fn scorers() -> Scorers {
        Scorers {
            trigram: Box::new(TrigramScorer),
            full_text: Some(Box::new(FullTextScorer::new(Language::English))),
        }
    }

    fn candidate(article_id: i64, cluster_id: i64, title: &str, summary: Option<&str>) -> CandidateArticle {
        CandidateArticle {
            article_id,
            cluster_id,
            title: title.to_string(),
            summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn test_reduces_to_cluster_maxima() {
        let incoming = ArticleText::new("Markets rally after earnings", None);
        let candidates = vec![
            candidate(1, 10, "Weather turns cold in the north", None),
            candidate(2, 10, "Stock markets rally following earnings reports", None),
            candidate(3, 20, "Football final ends in a draw", None),
        ];

        let scores = score_candidates(&incoming, &candidates, &scorers());
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].cluster_id, 10);
        assert_eq!(scores[1].cluster_id, 20);

        let best_member = scorers()
            .prepare(&incoming)
            .trigram(&ArticleText::new("Stock markets rally following earnings reports", None));
        assert_eq!(scores[0].trigram, best_member);
        assert!(scores[0].full_text_raw > 0.0);
        assert!(scores[0].trigram > scores[1].trigram);
        assert_eq!(scores[1].full_text_raw, 0.0);
    }

    #[test]
    fn test_summary_comparison() {
        let scorers = scorers();
        let incoming = ArticleText::new("Breaking", Some("Central bank raises interest rates"));
        let with_summary = ArticleText::new("Update", Some("Central bank raises interest rates"));
        let without_summary = ArticleText::new("Update", None);

        let prepared = scorers.prepare(&incoming);
        assert!((prepared.trigram(&with_summary) - 1.0).abs() < 1e-9);
        assert_eq!(
            prepared.trigram(&without_summary),
            scorers.trigram.score("Breaking", "Update")
        );
    }

    #[test]
    fn test_degraded_scorers_report_no_full_text() {
        let degraded = Scorers {
            trigram: Box::new(TrigramScorer),
            full_text: None,
        };
        assert!(degraded.is_degraded());

        let incoming = ArticleText::new("Markets rally", None);
        let scores = score_candidates(
            &incoming,
            &[candidate(1, 5, "Markets rally", None)],
            &degraded,
        );
        assert_eq!(scores[0].full_text_raw, 0.0);
        assert!((scores[0].trigram - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_candidates() {
        let incoming = ArticleText::new("Anything", None);
        assert!(score_candidates(&incoming, &[], &scorers()).is_empty());
    }

    #[test]
    fn test_incoming_text_is_prepared_once_per_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct CountingScorer {
            inner: TrigramScorer,
            prepared: Arc<AtomicUsize>,
        }

        impl SimilarityScorer for CountingScorer {
            fn name(&self) -> &'static str {
                "counting"
            }

            fn score(&self, text_a: &str, text_b: &str) -> f64 {
                self.inner.score(text_a, text_b)
            }

            fn prepare<'a>(&'a self, text_a: &str) -> Box<dyn PreparedScorer + 'a> {
                self.prepared.fetch_add(1, Ordering::SeqCst);
                self.inner.prepare(text_a)
            }
        }

        let trigram_prepared = Arc::new(AtomicUsize::new(0));
        let full_text_prepared = Arc::new(AtomicUsize::new(0));
        let scorers = Scorers {
            trigram: Box::new(CountingScorer {
                inner: TrigramScorer,
                prepared: trigram_prepared.clone(),
            }),
            full_text: Some(Box::new(CountingScorer {
                inner: TrigramScorer,
                prepared: full_text_prepared.clone(),
            })),
        };

        let incoming = ArticleText::new("Markets rally", Some("Stocks closed higher"));
        let candidates: Vec<CandidateArticle> = (0..5)
            .map(|i| candidate(i, i % 2, "Markets rally again", Some("Stocks higher")))
            .collect();
        let scores = score_candidates(&incoming, &candidates, &scorers);

        assert_eq!(scores.len(), 2);
        // Title and summary once each, however many candidates there are
        assert_eq!(trigram_prepared.load(Ordering::SeqCst), 2);
        assert_eq!(full_text_prepared.load(Ordering::SeqCst), 1);
    }
}
