use crate::catalog::DocumentSource;
use crate::error::{RecommendError, RecommendResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// How raw token counts are turned into feature weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Term frequency times smoothed inverse document frequency, rows L2-normalized.
    /// Suited to free text, where words common to many documents carry little signal.
    #[default]
    TfIdf,
    /// Raw counts. Suited to curated tag soups, where a frequent cast member or
    /// genre should not be penalized for being common.
    Count,
}

impl FromStr for Weighting {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(Weighting::TfIdf),
            "count" => Ok(Weighting::Count),
            other => Err(RecommendError::MalformedConfiguration(format!(
                "unknown weighting mode '{other}' (expected 'tfidf' or 'count')"
            ))),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weighting::TfIdf => f.write_str("tfidf"),
            Weighting::Count => f.write_str("count"),
        }
    }
}

/// Stop words removed before building the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    None,
    #[default]
    English,
    Custom(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub weighting: Weighting,
    pub stop_words: StopWords,
    /// Keep only this many terms, ranked by corpus frequency.
    pub max_features: Option<usize>,
    /// Use idf = ln((1 + N) / (1 + df)) + 1 instead of ln(N / df) + 1
    pub smooth_idf: bool,
    /// Use tf = 1 + ln(count) instead of the raw count
    pub sublinear_tf: bool,
    pub stem: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            weighting: Weighting::TfIdf,
            stop_words: StopWords::English,
            max_features: None,
            smooth_idf: true,
            sublinear_tf: false,
            stem: false,
        }
    }
}

impl RecommenderConfig {
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting, ..Self::default() }
    }

    /// Settings for one build: the config file if given, then the explicit
    /// weighting override. Without either, weighting follows the document source.
    pub fn resolve<P: AsRef<Path>>(
        config_path: Option<P>,
        document: DocumentSource,
        weighting: Option<Weighting>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => ConfigFile::from_json_file(path)?,
            None => ConfigFile::default(),
        };
        let mut config = file.into_config(document.default_weighting());
        if let Some(w) = weighting {
            config.weighting = w;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn validate(&self) -> RecommendResult<()> {
        if self.max_features == Some(0) {
            return Err(RecommendError::MalformedConfiguration(
                "max_features must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// The on-disk form of [`RecommenderConfig`]. Every field may be left out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub weighting: Option<Weighting>,
    pub stop_words: Option<StopWords>,
    pub max_features: Option<usize>,
    pub smooth_idf: Option<bool>,
    pub sublinear_tf: Option<bool>,
    pub stem: Option<bool>,
}

impl ConfigFile {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let file: ConfigFile = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(file)
    }

    /// Fill unset fields from the defaults, using `weighting` when the file names none.
    pub fn into_config(self, weighting: Weighting) -> RecommenderConfig {
        let defaults = RecommenderConfig::default();
        RecommenderConfig {
            weighting: self.weighting.unwrap_or(weighting),
            stop_words: self.stop_words.unwrap_or(defaults.stop_words),
            max_features: self.max_features,
            smooth_idf: self.smooth_idf.unwrap_or(defaults.smooth_idf),
            sublinear_tf: self.sublinear_tf.unwrap_or(defaults.sublinear_tf),
            stem: self.stem.unwrap_or(defaults.stem),
        }
    }
}
