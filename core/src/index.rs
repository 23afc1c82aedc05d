use crate::config::{RecommenderConfig, Weighting};
use crate::error::RecommendResult;
use crate::similarity::SimilarityMatrix;
use crate::vectorize::Vectorizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// A catalog entry. Its position is its index in the slice passed to [`build_index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    /// Plot text or tag soup; empty when the source field is missing.
    #[serde(default)]
    pub document: String,
}

impl Item {
    pub fn new(title: impl Into<String>, document: impl Into<String>) -> Self {
        Self { title: title.into(), document: document.into() }
    }
}

/// Title to position lookup.
///
/// Built in item order with later positions overwriting earlier ones, so a
/// repeated title resolves to its last occurrence.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    positions: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl TitleIndex {
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = HashMap::new();
        let mut duplicates = Vec::new();
        for (pos, title) in titles.into_iter().enumerate() {
            let title = title.as_ref();
            if positions.insert(title.to_string(), pos).is_some() && !duplicates.iter().any(|d| d == title) {
                duplicates.push(title.to_string());
            }
        }
        Self { positions, duplicates }
    }

    pub fn get(&self, title: &str) -> Option<usize> { self.positions.get(title).copied() }
    pub fn contains(&self, title: &str) -> bool { self.positions.contains_key(title) }

    /// Number of distinct titles.
    pub fn len(&self) -> usize { self.positions.len() }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Titles that occurred more than once, in order of first repetition.
    pub fn duplicates(&self) -> &[String] { &self.duplicates }
}

/// Everything a neighbor query needs, built once and then only read.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    similarity: SimilarityMatrix,
    titles: TitleIndex,
    item_titles: Vec<String>,
    weighting: Weighting,
    vocabulary_size: usize,
}

impl BuiltIndex {
    pub fn similarity(&self) -> &SimilarityMatrix { &self.similarity }
    pub fn titles(&self) -> &TitleIndex { &self.titles }
    pub fn item_titles(&self) -> &[String] { &self.item_titles }
    pub fn title_at(&self, position: usize) -> Option<&str> { self.item_titles.get(position).map(String::as_str) }
    pub fn weighting(&self) -> Weighting { self.weighting }
    pub fn vocabulary_size(&self) -> usize { self.vocabulary_size }
    pub fn len(&self) -> usize { self.item_titles.len() }
    pub fn is_empty(&self) -> bool { self.item_titles.is_empty() }
}

/// Vectorize `items`, build their similarity matrix and title index.
pub fn build_index(items: &[Item], config: &RecommenderConfig) -> RecommendResult<BuiltIndex> {
    let start = Instant::now();
    let vectorizer = Vectorizer::new(config)?;
    let documents: Vec<&str> = items.iter().map(|it| it.document.as_str()).collect();
    let features = vectorizer.fit_transform(&documents);
    let similarity = SimilarityMatrix::from_features(&features);

    let item_titles: Vec<String> = items.iter().map(|it| it.title.clone()).collect();
    let titles = TitleIndex::from_titles(&item_titles);
    if !titles.duplicates().is_empty() {
        tracing::warn!(
            count = titles.duplicates().len(),
            "duplicate titles resolve to their last occurrence"
        );
    }

    tracing::info!(
        items = items.len(),
        vocabulary = features.n_terms(),
        weighting = %config.weighting,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index build complete"
    );

    Ok(BuiltIndex {
        similarity,
        titles,
        item_titles,
        weighting: config.weighting,
        vocabulary_size: features.n_terms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_wins_for_repeated_titles() {
        let idx = TitleIndex::from_titles(["Heat", "Alien", "Heat", "Heat"]);
        assert_eq!(idx.get("Heat"), Some(3));
        assert_eq!(idx.get("Alien"), Some(1));
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.duplicates(), &["Heat".to_string()]);
    }

    #[test]
    fn lookup_is_exact() {
        let idx = TitleIndex::from_titles(["The Matrix"]);
        assert!(idx.contains("The Matrix"));
        assert_eq!(idx.get("the matrix"), None);
    }

    #[test]
    fn build_reports_sizes() {
        let items = vec![Item::new("A", "robots in space"), Item::new("B", "")];
        let built = build_index(&items, &RecommenderConfig::default()).unwrap();
        assert_eq!(built.len(), 2);
        assert_eq!(built.vocabulary_size(), 2);
        assert_eq!(built.title_at(1), Some("B"));
        assert_eq!(built.similarity().len(), 2);
    }
}
