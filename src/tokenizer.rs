use crate::document::DocumentCollection;
use crate::error::{EsaError, EsaResult};
use crate::stopwords;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use unicode_segmentation::UnicodeSegmentation;

/// Languages the preprocessor can stem and strip stop-words from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Portuguese,
    Spanish,
    French,
    German,
    Italian,
}

impl Language {
    fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Spanish => Algorithm::Spanish,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
        }
    }

    fn stopwords(self) -> &'static HashSet<&'static str> {
        match self {
            Language::English => &stopwords::ENGLISH,
            Language::Portuguese => &stopwords::PORTUGUESE,
            Language::Spanish => &stopwords::SPANISH,
            Language::French => &stopwords::FRENCH,
            Language::German => &stopwords::GERMAN,
            Language::Italian => &stopwords::ITALIAN,
        }
    }
}

impl FromStr for Language {
    type Err = EsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "spanish" | "es" => Ok(Language::Spanish),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "italian" | "it" => Ok(Language::Italian),
            other => Err(EsaError::configuration(format!(
                "unsupported language '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::Portuguese => "portuguese",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Italian => "italian",
        };
        f.write_str(name)
    }
}

/// Normalization steps applied to raw document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub to_lower: bool,
    pub strip_accents: bool,
    pub strip_punctuation: bool,
    pub strip_numbers: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub language: String,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            to_lower: true,
            strip_accents: true,
            strip_punctuation: true,
            strip_numbers: true,
            remove_stopwords: true,
            stem: true,
            language: Language::Portuguese.to_string(),
        }
    }
}

impl PreprocessOptions {
    /// Options that leave the text untouched
    pub fn none() -> Self {
        Self {
            to_lower: false,
            strip_accents: false,
            strip_punctuation: false,
            strip_numbers: false,
            remove_stopwords: false,
            stem: false,
            ..Default::default()
        }
    }
}

/// Splits a document string into its ordered term tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Tokenizer for text that has already been normalized
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Turns raw text into the canonical, whitespace-separated form the model expects
pub struct Preprocessor {
    options: PreprocessOptions,
    language: Language,
    stemmer: Option<Stemmer>,
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("options", &self.options)
            .field("language", &self.language)
            .finish()
    }
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> EsaResult<Self> {
        let language: Language = options.language.parse()?;

        let stemmer = options
            .stem
            .then(|| Stemmer::create(language.algorithm()));

        Ok(Self {
            options,
            language,
            stemmer,
        })
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Split text on unicode word boundaries, dropping whitespace
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    fn stopword_filter(&self, tokens: Vec<String>) -> Vec<String> {
        let stopwords = self.language.stopwords();
        tokens
            .into_iter()
            .filter(|t| !stopwords.contains(t.as_str()))
            .collect()
    }

    fn stemmer_filter(&self, tokens: Vec<String>) -> Vec<String> {
        match &self.stemmer {
            Some(stemmer) => tokens
                .into_iter()
                .map(|t| stemmer.stem(&t).into_owned())
                .collect(),
            None => tokens,
        }
    }

    /// Full normalization pipeline
    pub fn process(&self, text: &str) -> String {
        let mut text = if self.options.to_lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.options.strip_accents {
            text = strip_accents(&text);
        }

        if self.options.strip_punctuation {
            text.retain(|c| !c.is_ascii_punctuation());
        }

        if self.options.strip_numbers {
            text.retain(|c| !c.is_ascii_digit());
        }

        if self.options.remove_stopwords {
            text = self.stopword_filter(self.tokenize(&text)).join(" ");
        }

        if self.options.stem {
            text = self.stemmer_filter(self.tokenize(&text)).join(" ");
        }

        text
    }

    pub fn process_collection(&self, collection: &DocumentCollection) -> DocumentCollection {
        collection.map_texts(|text| self.process(text))
    }
}

/// Fold accented Latin letters and compatibility forms to ASCII and drop anything
/// else outside ASCII, the same as NFKD followed by an ASCII-only encode
pub fn strip_accents(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(base) = fold_char(c) {
            folded.push(base);
        } else if let Some(expansion) = expand_compatibility(c) {
            folded.push_str(expansion);
        }
    }
    folded
}

fn expand_compatibility(c: char) -> Option<&'static str> {
    let expansion = match c {
        'ﬀ' => "ff",
        'ﬁ' => "fi",
        'ﬂ' => "fl",
        'ﬃ' => "ffi",
        'ﬄ' => "ffl",
        'ﬅ' | 'ﬆ' => "st",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        '¼' => "14",
        '½' => "12",
        '¾' => "34",
        '™' => "TM",
        '…' => "...",
        _ => return None,
    };
    Some(expansion)
}

fn fold_char(c: char) -> Option<char> {
    if c.is_ascii() {
        return Some(c);
    }
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ĥ' => 'h',
        'Ĥ' => 'H',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ĵ' => 'j',
        'Ĵ' => 'J',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'Ĺ' | 'Ļ' | 'Ľ' => 'L',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ţ' | 'ť' => 't',
        'Ţ' | 'Ť' => 'T',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ŵ' => 'w',
        'Ŵ' => 'W',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'Ý' | 'Ŷ' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        'ª' => 'a',
        'º' => 'o',
        'ſ' => 's',
        'ŀ' => 'l',
        'Ŀ' => 'L',
        'ŉ' => 'n',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '\u{a0}' | '´' | '¨' | '¯' | '¸' => ' ',
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokens = WhitespaceTokenizer.tokenize("  gato\tcachorro \n peixe ");
        assert_eq!(tokens, vec!["gato", "cachorro", "peixe"]);
    }

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("Ação é ótima"), "Acao e otima");
        assert_eq!(strip_accents("naïve → café"), "naive  cafe");
    }

    #[test]
    fn test_strip_accents_compatibility_forms() {
        assert_eq!(strip_accents("1ª vez, 2º lugar"), "1a vez, 2o lugar");
        assert_eq!(strip_accents("ﬁm do ﬂuxo"), "fim do fluxo");
        assert_eq!(strip_accents("x²\u{a0}½"), "x2 12");
    }

    #[test]
    fn test_unknown_language_is_configuration_error() {
        let options = PreprocessOptions {
            language: "klingon".to_string(),
            ..Default::default()
        };
        let err = Preprocessor::new(options).unwrap_err();
        assert!(matches!(err, EsaError::Configuration { .. }));
    }

    #[test]
    fn test_every_language_builds_with_defaults() -> EsaResult<()> {
        for language in ["english", "portuguese", "spanish", "french", "german", "italian"] {
            let options = PreprocessOptions {
                language: language.to_string(),
                ..Default::default()
            };
            Preprocessor::new(options)?;
        }
        Ok(())
    }

    #[test]
    fn test_french_stopwords_removed() -> EsaResult<()> {
        let options = PreprocessOptions {
            language: "french".to_string(),
            stem: false,
            ..Default::default()
        };
        let preprocessor = Preprocessor::new(options)?;
        assert_eq!(preprocessor.process("Le chat est dans la maison"), "chat maison");
        Ok(())
    }

    #[test]
    fn test_portuguese_verb_forms_are_stopwords() -> EsaResult<()> {
        let options = PreprocessOptions {
            stem: false,
            ..Default::default()
        };
        let preprocessor = Preprocessor::new(options)?;
        let text = preprocessor.process("eu estava aqui e tinha sido ele quem fui");
        assert_eq!(text, "aqui sido");
        Ok(())
    }

    #[test]
    fn test_process_without_stemming() -> EsaResult<()> {
        let options = PreprocessOptions {
            stem: false,
            ..Default::default()
        };
        let preprocessor = Preprocessor::new(options)?;
        let text = preprocessor.process("O Gato e o Cachorro, em 2019, não brigaram!");
        assert_eq!(text, "gato cachorro nao brigaram");
        Ok(())
    }

    #[test]
    fn test_process_stems_english() -> EsaResult<()> {
        let options = PreprocessOptions {
            language: "english".to_string(),
            ..Default::default()
        };
        let preprocessor = Preprocessor::new(options)?;
        let text = preprocessor.process("The cats are running quickly");
        let tokens: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(tokens, vec!["cat", "run", "quick"]);
        Ok(())
    }

    #[test]
    fn test_process_none_is_identity() -> EsaResult<()> {
        let preprocessor = Preprocessor::new(PreprocessOptions::none())?;
        assert_eq!(preprocessor.process("Keep It, 42!"), "Keep It, 42!");
        Ok(())
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("Portuguese".parse::<Language>().ok(), Some(Language::Portuguese));
        assert_eq!("en".parse::<Language>().ok(), Some(Language::English));
        assert!("".parse::<Language>().is_err());
    }
}
