use crate::config::{RecommenderConfig, Weighting};
use crate::error::RecommendResult;
use crate::tokenizer::Analyzer;
use std::collections::{HashMap, HashSet};

pub type TermId = u32;

/// Sparse feature rows, one per document, over a shared vocabulary.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    df: Vec<u32>,
    rows: Vec<Vec<(TermId, f32)>>, // sorted by term id
    normalized: bool,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize { self.rows.len() }
    pub fn n_terms(&self) -> usize { self.terms.len() }
    pub fn row(&self, i: usize) -> &[(TermId, f32)] { &self.rows[i] }
    pub fn rows(&self) -> &[Vec<(TermId, f32)>] { &self.rows }
    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }
    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }
    pub fn document_frequency(&self, id: TermId) -> u32 { self.df.get(id as usize).copied().unwrap_or(0) }

    /// True when every non-empty row has unit L2 norm.
    pub fn is_normalized(&self) -> bool { self.normalized }

    pub fn weight(&self, i: usize, term: &str) -> f32 {
        let Some(id) = self.term_id(term) else { return 0.0 };
        match self.rows[i].binary_search_by_key(&id, |&(t, _)| t) {
            Ok(idx) => self.rows[i][idx].1,
            Err(_) => 0.0,
        }
    }

    pub fn norm(&self, i: usize) -> f64 {
        self.rows[i].iter().map(|&(_, w)| (w as f64) * (w as f64)).sum::<f64>().sqrt()
    }
}

/// Builds a [`FeatureMatrix`] from an ordered set of documents.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    analyzer: Analyzer,
    weighting: Weighting,
    max_features: Option<usize>,
    smooth_idf: bool,
    sublinear_tf: bool,
}

impl Vectorizer {
    pub fn new(config: &RecommenderConfig) -> RecommendResult<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: Analyzer::new(&config.stop_words, config.stem),
            weighting: config.weighting,
            max_features: config.max_features,
            smooth_idf: config.smooth_idf,
            sublinear_tf: config.sublinear_tf,
        })
    }

    pub fn weighting(&self) -> Weighting { self.weighting }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> FeatureMatrix {
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut df: Vec<u32> = Vec::new();
        let mut cf: Vec<u64> = Vec::new();
        let mut counts: Vec<HashMap<TermId, u32>> = Vec::with_capacity(documents.len());

        for doc in documents {
            let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
            let mut seen_in_doc: HashSet<TermId> = HashSet::new();
            for term in self.analyzer.tokenize(doc.as_ref()) {
                let tid = match dictionary.get(&term) {
                    Some(&id) => id,
                    None => {
                        let id = terms.len() as TermId;
                        dictionary.insert(term.clone(), id);
                        terms.push(term);
                        df.push(0);
                        cf.push(0);
                        id
                    }
                };
                *tf_counts.entry(tid).or_insert(0) += 1;
                cf[tid as usize] += 1;
                if seen_in_doc.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
            counts.push(tf_counts);
        }

        if let Some(limit) = self.max_features {
            if limit < terms.len() {
                let remap = top_terms(&cf, limit);
                let mut kept_terms = Vec::with_capacity(limit);
                let mut kept_df = Vec::with_capacity(limit);
                for (old, new) in remap.iter().enumerate() {
                    if new.is_some() {
                        kept_terms.push(std::mem::take(&mut terms[old]));
                        kept_df.push(df[old]);
                    }
                }
                for tf_counts in counts.iter_mut() {
                    *tf_counts = tf_counts
                        .drain()
                        .filter_map(|(tid, c)| remap[tid as usize].map(|new| (new, c)))
                        .collect();
                }
                terms = kept_terms;
                df = kept_df;
                dictionary = terms.iter().enumerate().map(|(i, t)| (t.clone(), i as TermId)).collect();
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| {
                let d = d.max(1) as f64;
                if self.smooth_idf { ((1.0 + n) / (1.0 + d)).ln() + 1.0 } else { (n / d).ln() + 1.0 }
            })
            .collect();

        let rows: Vec<Vec<(TermId, f32)>> = counts
            .into_iter()
            .map(|tf_counts| {
                let mut row: Vec<(TermId, f64)> = tf_counts
                    .into_iter()
                    .map(|(tid, c)| match self.weighting {
                        Weighting::Count => (tid, c as f64),
                        Weighting::TfIdf => (tid, self.term_frequency(c) * idf[tid as usize]),
                    })
                    .collect();
                row.sort_by_key(|&(tid, _)| tid);
                if self.weighting == Weighting::TfIdf {
                    let norm = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                    if norm > 0.0 {
                        for (_, w) in row.iter_mut() { *w /= norm; }
                    }
                }
                row.into_iter().map(|(tid, w)| (tid, w as f32)).collect()
            })
            .collect();

        tracing::debug!(
            documents = rows.len(),
            vocabulary = terms.len(),
            weighting = %self.weighting,
            "vectorized corpus"
        );

        FeatureMatrix { dictionary, terms, df, rows, normalized: self.weighting == Weighting::TfIdf }
    }

    fn term_frequency(&self, count: u32) -> f64 {
        if self.sublinear_tf { 1.0 + (count as f64).ln() } else { count as f64 }
    }
}

/// Maps each old term id to its new id when the term survives a `limit`-sized cut.
/// Terms are ranked by corpus frequency; ties keep first-seen order. Survivors keep
/// their relative first-seen order.
fn top_terms(cf: &[u64], limit: usize) -> Vec<Option<TermId>> {
    let mut order: Vec<usize> = (0..cf.len()).collect();
    order.sort_by(|&a, &b| cf[b].cmp(&cf[a]));
    let mut keep = vec![false; cf.len()];
    for &old in order.iter().take(limit) {
        keep[old] = true;
    }
    let mut next: TermId = 0;
    keep.into_iter()
        .map(|k| {
            if k {
                let id = next;
                next += 1;
                Some(id)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StopWords;

    fn vectorizer(weighting: Weighting) -> Vectorizer {
        Vectorizer::new(&RecommenderConfig::new(weighting).with_stop_words(StopWords::None)).unwrap()
    }

    #[test]
    fn count_rows_hold_raw_counts() {
        let m = vectorizer(Weighting::Count).fit_transform(&["tom tom hanks", "hanks"]);
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_terms(), 2);
        assert_eq!(m.weight(0, "tom"), 2.0);
        assert_eq!(m.weight(0, "hanks"), 1.0);
        assert_eq!(m.weight(1, "tom"), 0.0);
        assert!(!m.is_normalized());
    }

    #[test]
    fn tfidf_rows_are_unit_length() {
        let m = vectorizer(Weighting::TfIdf).fit_transform(&["space pirates attack", "pirates of the sea", "quiet drama"]);
        assert!(m.is_normalized());
        for i in 0..m.n_rows() {
            assert!((m.norm(i) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn tfidf_down_weights_common_terms() {
        let m = vectorizer(Weighting::TfIdf).fit_transform(&["war hero", "war story", "war drama"]);
        assert!(m.weight(0, "war") < m.weight(0, "hero"));
        assert_eq!(m.document_frequency(m.term_id("war").unwrap()), 3);
    }

    #[test]
    fn empty_documents_give_zero_rows() {
        let m = vectorizer(Weighting::TfIdf).fit_transform(&["", "robots"]);
        assert!(m.row(0).is_empty());
        assert_eq!(m.norm(0), 0.0);
    }

    #[test]
    fn vocabulary_follows_first_seen_order() {
        let m = vectorizer(Weighting::Count).fit_transform(&["zebra apple", "mango"]);
        assert_eq!(m.term(0), Some("zebra"));
        assert_eq!(m.term(1), Some("apple"));
        assert_eq!(m.term(2), Some("mango"));
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let config = RecommenderConfig::new(Weighting::Count)
            .with_stop_words(StopWords::None)
            .with_max_features(2);
        let m = Vectorizer::new(&config).unwrap().fit_transform(&["alien alien ship", "ship crew alien"]);
        assert_eq!(m.n_terms(), 2);
        assert!(m.term_id("alien").is_some());
        assert!(m.term_id("ship").is_some());
        assert!(m.term_id("crew").is_none());
        assert_eq!(m.weight(1, "alien"), 1.0);
    }

    #[test]
    fn smoothed_idf_matches_formula() {
        let m = vectorizer(Weighting::TfIdf).fit_transform(&["heist", "heist crew"]);
        // row 1: heist idf = ln(3/3)+1 = 1, crew idf = ln(3/2)+1
        let crew_idf = (3.0f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + crew_idf * crew_idf).sqrt();
        assert!((m.weight(1, "heist") as f64 - 1.0 / norm).abs() < 1e-6);
        assert!((m.weight(1, "crew") as f64 - crew_idf / norm).abs() < 1e-6);
    }

    #[test]
    fn sublinear_tf_matches_formula() {
        let config = RecommenderConfig { sublinear_tf: true, ..RecommenderConfig::new(Weighting::TfIdf) }
            .with_stop_words(StopWords::None);
        let m = Vectorizer::new(&config).unwrap().fit_transform(&["noir noir noir detective", "noir"]);
        // noir: tf = 1 + ln 3, idf = ln(3/3)+1 = 1; detective: tf = 1, idf = ln(3/2)+1
        let noir = 1.0 + 3.0f64.ln();
        let detective = (3.0f64 / 2.0).ln() + 1.0;
        let norm = (noir * noir + detective * detective).sqrt();
        assert!((m.weight(0, "noir") as f64 - noir / norm).abs() < 1e-6);
        assert!((m.weight(0, "detective") as f64 - detective / norm).abs() < 1e-6);
    }

    #[test]
    fn unsmoothed_idf_matches_formula() {
        let config = RecommenderConfig { smooth_idf: false, ..RecommenderConfig::new(Weighting::TfIdf) }
            .with_stop_words(StopWords::None);
        let m = Vectorizer::new(&config).unwrap().fit_transform(&["heist", "heist crew"]);
        // heist idf = ln(2/2)+1 = 1, crew idf = ln(2/1)+1
        let crew_idf = 2.0f64.ln() + 1.0;
        let norm = (1.0 + crew_idf * crew_idf).sqrt();
        assert!((m.weight(1, "heist") as f64 - 1.0 / norm).abs() < 1e-6);
        assert!((m.weight(1, "crew") as f64 - crew_idf / norm).abs() < 1e-6);
    }

    #[test]
    fn sublinear_and_unsmoothed_together() {
        let config = RecommenderConfig { sublinear_tf: true, smooth_idf: false, ..RecommenderConfig::new(Weighting::TfIdf) }
            .with_stop_words(StopWords::None);
        let m = Vectorizer::new(&config).unwrap().fit_transform(&["heist heist crew", "heist"]);
        // heist: (1 + ln 2) * 1; crew: 1 * (ln 2 + 1); equal, so each is 1/sqrt(2)
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert!((m.weight(0, "heist") as f64 - half).abs() < 1e-6);
        assert!((m.weight(0, "crew") as f64 - half).abs() < 1e-6);
        assert!((m.weight(1, "heist") - 1.0).abs() < 1e-6);
    }
}
