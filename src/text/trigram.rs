use std::collections::HashSet;

use super::normalizer::alphanumeric_words;

/// Distinct character trigrams of a text.
///
/// Each word is padded with two blanks in front and one behind before the
/// 3-character windows are taken, so word starts weigh more than word ends
/// and "cat" vs "cats" still share most of their grams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrigramSet {
    grams: HashSet<[char; 3]>,
}

impl TrigramSet {
    pub fn new(text: &str) -> Self {
        let mut grams = HashSet::new();

        for word in alphanumeric_words(text) {
            let padded: Vec<char> = "  "
                .chars()
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();
            for window in padded.windows(3) {
                grams.insert([window[0], window[1], window[2]]);
            }
        }

        Self { grams }
    }

    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    /// Shared trigrams over all distinct trigrams of both sets. Zero when
    /// either side has no trigrams.
    pub fn similarity(&self, other: &TrigramSet) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let common = self.grams.intersection(&other.grams).count();
        let union = self.len() + other.len() - common;
        common as f64 / union as f64
    }
}

/// Trigram similarity of two texts, in [0, 1].
pub fn trigram_similarity(text_a: &str, text_b: &str) -> f64 {
    TrigramSet::new(text_a).similarity(&TrigramSet::new(text_b))
}
