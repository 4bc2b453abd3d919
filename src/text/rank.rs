use std::collections::HashMap;

use super::normalizer::Tokenizer;

/// Weight given to every lexeme occurrence. Each cover is worth this much
/// before the proximity penalty.
const LEXEME_WEIGHT: f64 = 0.1;

/// A document turned into positioned lexemes.
#[derive(Debug, Clone, Default)]
pub struct TextVector {
    entries: Vec<(u32, String)>,
}

impl TextVector {
    pub fn new(tokenizer: &Tokenizer, text: &str) -> Self {
        Self {
            entries: tokenizer
                .lexemes(text)
                .into_iter()
                .map(|lexeme| (lexeme.position, lexeme.text))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A conjunctive query: every distinct lexeme must appear for a match.
#[derive(Debug, Clone, Default)]
pub struct TextQuery {
    terms: HashMap<String, usize>,
}

impl TextQuery {
    pub fn new(tokenizer: &Tokenizer, text: &str) -> Self {
        let mut terms = HashMap::new();
        for lexeme in tokenizer.lexemes(text) {
            let next = terms.len();
            terms.entry(lexeme.text).or_insert(next);
        }
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

/// Cover boundaries: `begin`/`end` index the list of matching occurrences,
/// `start`/`stop` are the word positions at those indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cover {
    begin: usize,
    end: usize,
    start: u32,
    stop: u32,
}

/// Cover-density rank of `document` for `query`.
///
/// A cover is a shortest run of the document that contains every query term.
/// Covers are found left to right, each search starting just after the
/// previous cover's first occurrence. Every cover adds `0.1 / (1 + noise)`,
/// where noise counts the positions inside the cover that are not query
/// terms, so repeated and tightly packed matches rank highest.
pub fn cover_density_rank(document: &TextVector, query: &TextQuery) -> f64 {
    if query.is_empty() || document.is_empty() {
        return 0.0;
    }

    // (position, term index) for every document lexeme that is a query term
    let occurrences: Vec<(u32, usize)> = document
        .entries
        .iter()
        .filter_map(|(position, text)| query.terms.get(text).map(|term| (*position, *term)))
        .collect();
    if occurrences.len() < query.len() {
        return 0.0;
    }

    let mut rank = 0.0;
    let mut from = 0;
    while let Some(cover) = next_cover(&occurrences, from, query.len()) {
        let items = (cover.end - cover.begin + 1) as f64;
        let inverse_weights = items / LEXEME_WEIGHT;
        let density = items / inverse_weights;

        let span = i64::from(cover.stop) - i64::from(cover.start);
        let mut noise = span - (cover.end - cover.begin) as i64;
        if noise < 0 {
            noise = (cover.end - cover.begin) as i64 / 2;
        }

        rank += density / (1.0 + noise as f64);
        from = cover.begin + 1;
    }

    rank
}

fn next_cover(occurrences: &[(u32, usize)], from: usize, term_count: usize) -> Option<Cover> {
    // Forward: the first index at which every term has been seen.
    let mut seen = vec![false; term_count];
    let mut remaining = term_count;
    let mut end = None;
    for (index, (_, term)) in occurrences.iter().enumerate().skip(from) {
        if !seen[*term] {
            seen[*term] = true;
            remaining -= 1;
            if remaining == 0 {
                end = Some(index);
                break;
            }
        }
    }
    let end = end?;

    // Backward from there: the last index at which every term is covered.
    let mut seen = vec![false; term_count];
    let mut remaining = term_count;
    let mut begin = from;
    for index in (from..=end).rev() {
        let term = occurrences[index].1;
        if !seen[term] {
            seen[term] = true;
            remaining -= 1;
            if remaining == 0 {
                begin = index;
                break;
            }
        }
    }

    Some(Cover {
        begin,
        end,
        start: occurrences[begin].0,
        stop: occurrences[end].0,
    })
}
