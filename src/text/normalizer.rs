use rust_stemmers::Stemmer;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::language::Language;
use super::stopwords::is_stopword;

/// NFKC-fold and lower-case. Full-width digits, ligatures and the like
/// compare equal to their plain forms afterwards.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Runs of alphanumeric characters, normalized. Apostrophes, hyphens and all
/// other punctuation split words.
pub fn alphanumeric_words(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// A lexeme and the 1-based word position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub position: u32,
    pub text: String,
}

/// Splits text into stemmed lexemes for one language configuration.
pub struct Tokenizer {
    language: Language,
    stemmer: Option<Stemmer>,
}

impl Tokenizer {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stemmer: language.stemmer_algorithm().map(Stemmer::create),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Lexemes in document order. Stopwords are dropped but still take up a
    /// position, so proximity is measured over the original wording.
    pub fn lexemes(&self, text: &str) -> Vec<Lexeme> {
        let normalized = normalize(text);
        let mut lexemes = Vec::new();

        for (index, word) in normalized.unicode_words().enumerate() {
            if is_stopword(self.language, word) {
                continue;
            }
            let text = match &self.stemmer {
                Some(stemmer) => stemmer.stem(word).into_owned(),
                None => word.to_string(),
            };
            if text.is_empty() {
                continue;
            }
            lexemes.push(Lexeme {
                position: index as u32 + 1,
                text,
            });
        }

        lexemes
    }
}
