use crate::config::StopWords;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Word runs of two or more word characters, the same shape as the usual
    // bag-of-words token pattern.
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","also","am","an","and","any","are","aren","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could","couldn",
            "did","didn","do","does","doesn","doing","don","down","during",
            "each","few","for","from","further",
            "had","hadn","has","hasn","have","haven","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","isn","it","its","itself",
            "just","ll","me","more","most","mustn","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "re","same","she","should","shouldn","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","we","were","weren","what","when","where","which","while","who","whom","why","will","with","won","would","wouldn",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Returns true if `token` is in the built-in English stop-word list.
pub fn is_english_stopword(token: &str) -> bool { ENGLISH_STOPWORDS.contains(token) }

/// Turns raw text into vocabulary tokens.
///
/// Text is NFKC-normalized and lowercased, split into word runs, stripped of
/// stop words and optionally stemmed.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: StopWordSet,
    stem: bool,
}

#[derive(Debug, Clone)]
enum StopWordSet {
    None,
    English,
    Custom(HashSet<String>),
}

impl StopWordSet {
    fn contains(&self, token: &str) -> bool {
        match self {
            StopWordSet::None => false,
            StopWordSet::English => is_english_stopword(token),
            StopWordSet::Custom(words) => words.contains(token),
        }
    }
}

impl Analyzer {
    pub fn new(stop_words: &StopWords, stem: bool) -> Self {
        let stop_words = match stop_words {
            StopWords::None => StopWordSet::None,
            StopWords::English => StopWordSet::English,
            StopWords::Custom(words) => {
                StopWordSet::Custom(words.iter().map(|w| w.nfkc().collect::<String>().to_lowercase()).collect())
            }
        };
        Self { stop_words, stem }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str();
            if self.stop_words.contains(token) { continue; }
            if self.stem {
                tokens.push(STEMMER.stem(token).to_string());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

impl Default for Analyzer {
    fn default() -> Self { Self::new(&StopWords::English, false) }
}

/// Tokenize with English stop words and no stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    Analyzer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("The Dark Knight rises!");
        assert_eq!(t, vec!["dark", "knight", "rises"]);
    }

    #[test]
    fn single_characters_are_not_tokens() {
        let t = Analyzer::new(&StopWords::None, false).tokenize("a b cd");
        assert_eq!(t, vec!["cd"]);
    }

    #[test]
    fn stemming_is_opt_in() {
        let stemmed = Analyzer::new(&StopWords::English, true).tokenize("running runners");
        assert!(stemmed.iter().all(|w| w.starts_with("run")));
        assert!(stemmed.contains(&"run".to_string()));
        let plain = tokenize("running");
        assert_eq!(plain, vec!["running"]);
    }

    #[test]
    fn custom_stop_words_are_case_insensitive() {
        let a = Analyzer::new(&StopWords::Custom(vec!["Space".into()]), false);
        assert_eq!(a.tokenize("space opera in SPACE"), vec!["opera", "in"]);
    }

    #[test]
    fn custom_stop_words_are_normalized_like_tokens() {
        let a = Analyzer::new(&StopWords::Custom(vec!["\u{FB01}lm".into()]), false);
        assert_eq!(a.tokenize("film noir"), vec!["noir"]);
    }
}
