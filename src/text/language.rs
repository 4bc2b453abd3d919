use rust_stemmers::Algorithm;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use whatlang::Lang;

use super::TARGET_TEXT;

/// Configuration used when the caller leaves the language blank.
pub const DEFAULT_LANGUAGE: Language = Language::Russian;

/// Tag asking for detection from the article text.
pub const AUTO_LANGUAGE: &str = "auto";

/// A text-search configuration: which stemmer and stopword list apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// No stemming, no stopwords.
    Simple,
    Arabic,
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Greek,
    Hungarian,
    Italian,
    Norwegian,
    Portuguese,
    Romanian,
    Russian,
    Spanish,
    Swedish,
    Tamil,
    Turkish,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no text search configuration for language '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Simple => "simple",
            Language::Arabic => "arabic",
            Language::Danish => "danish",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::Finnish => "finnish",
            Language::French => "french",
            Language::German => "german",
            Language::Greek => "greek",
            Language::Hungarian => "hungarian",
            Language::Italian => "italian",
            Language::Norwegian => "norwegian",
            Language::Portuguese => "portuguese",
            Language::Romanian => "romanian",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Swedish => "swedish",
            Language::Tamil => "tamil",
            Language::Turkish => "turkish",
        }
    }

    pub fn stemmer_algorithm(&self) -> Option<Algorithm> {
        match self {
            Language::Simple => None,
            Language::Arabic => Some(Algorithm::Arabic),
            Language::Danish => Some(Algorithm::Danish),
            Language::Dutch => Some(Algorithm::Dutch),
            Language::English => Some(Algorithm::English),
            Language::Finnish => Some(Algorithm::Finnish),
            Language::French => Some(Algorithm::French),
            Language::German => Some(Algorithm::German),
            Language::Greek => Some(Algorithm::Greek),
            Language::Hungarian => Some(Algorithm::Hungarian),
            Language::Italian => Some(Algorithm::Italian),
            Language::Norwegian => Some(Algorithm::Norwegian),
            Language::Portuguese => Some(Algorithm::Portuguese),
            Language::Romanian => Some(Algorithm::Romanian),
            Language::Russian => Some(Algorithm::Russian),
            Language::Spanish => Some(Algorithm::Spanish),
            Language::Swedish => Some(Algorithm::Swedish),
            Language::Tamil => Some(Algorithm::Tamil),
            Language::Turkish => Some(Algorithm::Turkish),
        }
    }

    /// Guess the language of `text`. Returns `None` when the guess is
    /// unreliable or names a language without a configuration here.
    pub fn detect(text: &str) -> Option<Language> {
        let info = whatlang::detect(text)?;
        if !info.is_reliable() {
            debug!(target: TARGET_TEXT, "Unreliable language guess {:?} ({:.2})", info.lang(), info.confidence());
            return None;
        }

        let language = match info.lang() {
            Lang::Ara => Language::Arabic,
            Lang::Dan => Language::Danish,
            Lang::Nld => Language::Dutch,
            Lang::Eng => Language::English,
            Lang::Fin => Language::Finnish,
            Lang::Fra => Language::French,
            Lang::Deu => Language::German,
            Lang::Ell => Language::Greek,
            Lang::Hun => Language::Hungarian,
            Lang::Ita => Language::Italian,
            Lang::Nob => Language::Norwegian,
            Lang::Por => Language::Portuguese,
            Lang::Ron => Language::Romanian,
            Lang::Rus => Language::Russian,
            Lang::Spa => Language::Spanish,
            Lang::Swe => Language::Swedish,
            Lang::Tam => Language::Tamil,
            Lang::Tur => Language::Turkish,
            other => {
                debug!(target: TARGET_TEXT, "Detected {:?}, which has no text search configuration", other);
                return None;
            }
        };

        Some(language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts configuration names (`russian`) and ISO 639-1 codes (`ru`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = match s.trim().to_lowercase().as_str() {
            "simple" => Language::Simple,
            "arabic" | "ar" => Language::Arabic,
            "danish" | "da" => Language::Danish,
            "dutch" | "nl" => Language::Dutch,
            "english" | "en" => Language::English,
            "finnish" | "fi" => Language::Finnish,
            "french" | "fr" => Language::French,
            "german" | "de" => Language::German,
            "greek" | "el" => Language::Greek,
            "hungarian" | "hu" => Language::Hungarian,
            "italian" | "it" => Language::Italian,
            "norwegian" | "no" | "nb" => Language::Norwegian,
            "portuguese" | "pt" => Language::Portuguese,
            "romanian" | "ro" => Language::Romanian,
            "russian" | "ru" => Language::Russian,
            "spanish" | "es" => Language::Spanish,
            "swedish" | "sv" => Language::Swedish,
            "tamil" | "ta" => Language::Tamil,
            "turkish" | "tr" => Language::Turkish,
            _ => return Err(UnknownLanguage(s.trim().to_string())),
        };
        Ok(language)
    }
}

/// The language a resolution call runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLanguage {
    Known(Language),
    /// A tag nothing here can tokenize; full-text scoring is skipped.
    Unsupported(String),
}

impl ResolvedLanguage {
    /// Turns the caller's tag into a configuration. Blank means the default
    /// language, `auto` detects from `text` and falls back to `simple`.
    pub fn resolve(tag: &str, text: &str) -> Self {
        let tag = tag.trim();
        if tag.is_empty() {
            return ResolvedLanguage::Known(DEFAULT_LANGUAGE);
        }
        if tag.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            let detected = Language::detect(text).unwrap_or(Language::Simple);
            debug!(target: TARGET_TEXT, "Auto-detected language: {}", detected);
            return ResolvedLanguage::Known(detected);
        }

        match tag.parse::<Language>() {
            Ok(language) => ResolvedLanguage::Known(language),
            Err(UnknownLanguage(tag)) => ResolvedLanguage::Unsupported(tag.to_lowercase()),
        }
    }

    /// The tag stored on a new story.
    pub fn tag(&self) -> &str {
        match self {
            ResolvedLanguage::Known(language) => language.as_str(),
            ResolvedLanguage::Unsupported(tag) => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!("russian".parse::<Language>().unwrap(), Language::Russian);
        assert_eq!("RU".parse::<Language>().unwrap(), Language::Russian);
        assert_eq!(" english ".parse::<Language>().unwrap(), Language::English);
        assert_eq!("simple".parse::<Language>().unwrap(), Language::Simple);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_resolve_defaults_and_unsupported() {
        assert_eq!(
            ResolvedLanguage::resolve("", "anything"),
            ResolvedLanguage::Known(Language::Russian)
        );

        let unsupported = ResolvedLanguage::resolve("Klingon", "anything");
        assert_eq!(unsupported, ResolvedLanguage::Unsupported("klingon".to_string()));
        assert_eq!(unsupported.tag(), "klingon");
    }

    #[test]
    fn test_auto_detection() {
        let english = ResolvedLanguage::resolve(
            "auto",
            "The central bank raised interest rates again on Thursday, surprising most economists who had expected a pause.",
        );
        assert_eq!(english, ResolvedLanguage::Known(Language::English));

        let russian = ResolvedLanguage::resolve(
            "AUTO",
            "Центральный банк в четверг снова повысил ключевую ставку, удивив большинство экономистов, ожидавших паузы.",
        );
        assert_eq!(russian, ResolvedLanguage::Known(Language::Russian));

        // Too little text to say anything
        assert_eq!(
            ResolvedLanguage::resolve("auto", "42"),
            ResolvedLanguage::Known(Language::Simple)
        );
    }
}
