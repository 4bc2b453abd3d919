use super::types::{Decision, NormalizedCandidate};
use crate::config::ResolveOptions;

pub fn combined_score(candidate: &NormalizedCandidate, options: &ResolveOptions) -> f64 {
    options.w_trgm * candidate.trigram + options.w_ft * candidate.full_text_normalized
}

/// The surviving story with the highest combined score. Equal scores go to
/// the lowest cluster id so the outcome never depends on row order.
pub fn best_candidate(
    candidates: &[NormalizedCandidate],
    options: &ResolveOptions,
) -> Option<(i64, f64)> {
    let mut best: Option<(i64, f64)> = None;

    for candidate in candidates {
        let score = combined_score(candidate, options);
        best = match best {
            Some((best_id, best_score))
                if best_score > score || (best_score == score && best_id < candidate.cluster_id) =>
            {
                Some((best_id, best_score))
            }
            _ => Some((candidate.cluster_id, score)),
        };
    }

    best
}

/// MATCH when the best survivor reaches `min_score`, NEW otherwise.
pub fn decide(candidates: &[NormalizedCandidate], options: &ResolveOptions) -> Decision {
    match best_candidate(candidates, options) {
        Some((cluster_id, score)) if score >= options.min_score => {
            Decision::Match { cluster_id, score }
        }
        Some((_, score)) => Decision::New {
            best_score: Some(score),
        },
        None => Decision::New { best_score: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::aggregate::{normalize_and_filter, CandidateStats};
    use crate::clustering::types::ClusterScore;

    fn candidate(cluster_id: i64, trigram: f64, normalized: f64) -> NormalizedCandidate {
        NormalizedCandidate {
            cluster_id,
            trigram,
            full_text_raw: normalized,
            full_text_normalized: normalized,
        }
    }

    fn run(scores: &[ClusterScore], options: &ResolveOptions) -> Decision {
        let stats = CandidateStats::from_scores(scores);
        decide(&normalize_and_filter(scores, &stats, options), options)
    }

    #[test]
    fn test_markets_rally_joins_existing_story() {
        // Three competing stories, round maximum 0.20, this one 0.18 raw
        let scores = [
            ClusterScore {
                cluster_id: 11,
                trigram: 0.55,
                full_text_raw: 0.18,
            },
            ClusterScore {
                cluster_id: 12,
                trigram: 0.20,
                full_text_raw: 0.20,
            },
            ClusterScore {
                cluster_id: 13,
                trigram: 0.05,
                full_text_raw: 0.0,
            },
        ];

        match run(&scores, &ResolveOptions::default()) {
            Decision::Match { cluster_id, score } => {
                assert_eq!(cluster_id, 11);
                assert!((score - 0.6375).abs() < 1e-9);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_novel_topic_seeds_new_story() {
        let scores = [ClusterScore {
            cluster_id: 4,
            trigram: 0.10,
            full_text_raw: 0.02,
        }];
        assert_eq!(
            run(&scores, &ResolveOptions::default()),
            Decision::New { best_score: None }
        );
    }

    #[test]
    fn test_survivor_below_min_score_is_new() {
        let options = ResolveOptions::default();
        // Passes the trigram floor, but 0.75 * 0.40 = 0.30 < 0.42
        let decision = decide(&[candidate(3, 0.40, 0.0)], &options);
        match decision {
            Decision::New { best_score } => {
                assert!((best_score.unwrap() - 0.30).abs() < 1e-9);
                assert!((decision.score() - 0.30).abs() < 1e-9);
            }
            other => panic!("expected a new story, got {:?}", other),
        }
    }

    #[test]
    fn test_ties_go_to_lowest_cluster_id() {
        let options = ResolveOptions::default();
        let candidates = [
            candidate(30, 0.8, 0.5),
            candidate(10, 0.8, 0.5),
            candidate(20, 0.8, 0.5),
        ];
        assert_eq!(best_candidate(&candidates, &options).unwrap().0, 10);

        let mut reversed = candidates;
        reversed.reverse();
        assert_eq!(best_candidate(&reversed, &options).unwrap().0, 10);
    }

    #[test]
    fn test_higher_score_beats_lower_id() {
        let options = ResolveOptions::default();
        let candidates = [candidate(1, 0.5, 0.0), candidate(2, 0.9, 0.0)];
        assert_eq!(best_candidate(&candidates, &options).unwrap().0, 2);
    }

    #[test]
    fn test_raising_min_score_never_adds_matches() {
        let rounds: Vec<Vec<NormalizedCandidate>> = vec![
            vec![candidate(1, 0.55, 0.9), candidate(2, 0.2, 1.0)],
            vec![candidate(3, 0.40, 0.0)],
            vec![candidate(4, 0.90, 1.0)],
            vec![candidate(5, 0.35, 0.2), candidate(6, 0.50, 0.1)],
            vec![],
        ];

        let mut previous_matches = usize::MAX;
        for step in 0..=20 {
            let options = ResolveOptions {
                min_score: step as f64 * 0.05,
                ..Default::default()
            };
            let matches = rounds
                .iter()
                .filter(|round| decide(round, &options).is_match())
                .count();
            assert!(matches <= previous_matches);
            previous_matches = matches;
        }
        assert_eq!(previous_matches, 0);
    }

    #[test]
    fn test_weights_apply() {
        let trigram_only = ResolveOptions {
            w_trgm: 1.0,
            w_ft: 0.0,
            ..Default::default()
        };
        let candidate = candidate(1, 0.5, 1.0);
        assert!((combined_score(&candidate, &trigram_only) - 0.5).abs() < 1e-9);
        assert!((combined_score(&candidate, &ResolveOptions::default()) - 0.625).abs() < 1e-9);
    }
}
