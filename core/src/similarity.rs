use crate::vectorize::FeatureMatrix;

#[derive(Debug, Clone, Copy)]
struct Posting {
    item: usize,
    weight: f32,
}

/// Dense, symmetric item-by-item cosine similarity.
///
/// Scores lie in `[0, 1]`. A non-empty item scores exactly `1.0` against itself;
/// an item with an empty feature row scores `0.0` against everything, itself included.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>, // row-major n * n
}

impl SimilarityMatrix {
    pub fn from_features(features: &FeatureMatrix) -> Self {
        let n = features.n_rows();
        let normalized = features.is_normalized();

        // Inverted postings per term; items are pushed in order so each list is sorted.
        let mut postings: Vec<Vec<Posting>> = vec![Vec::new(); features.n_terms()];
        for (item, row) in features.rows().iter().enumerate() {
            for &(tid, weight) in row {
                postings[tid as usize].push(Posting { item, weight });
            }
        }
        let norms: Vec<f64> = (0..n).map(|i| features.norm(i)).collect();

        let mut scores = vec![0.0f32; n * n];
        let mut acc = vec![0.0f64; n];
        for i in 0..n {
            if norms[i] == 0.0 { continue; }
            for &(tid, w_i) in features.row(i) {
                let plist = &postings[tid as usize];
                let start = plist.partition_point(|p| p.item < i);
                for p in &plist[start..] {
                    acc[p.item] += w_i as f64 * p.weight as f64;
                }
            }
            scores[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let dot = std::mem::take(&mut acc[j]);
                if dot == 0.0 || norms[j] == 0.0 { continue; }
                let sim = if normalized { dot } else { dot / (norms[i] * norms[j]) };
                let sim = sim.clamp(0.0, 1.0) as f32;
                scores[i * n + j] = sim;
                scores[j * n + i] = sim;
            }
            acc[i] = 0.0;
        }

        tracing::debug!(items = n, "built similarity matrix");
        Self { n, scores }
    }

    /// Number of items (rows and columns).
    pub fn len(&self) -> usize { self.n }
    pub fn is_empty(&self) -> bool { self.n == 0 }

    pub fn get(&self, i: usize, j: usize) -> f32 { self.scores[i * self.n + j] }

    pub fn row(&self, i: usize) -> &[f32] { &self.scores[i * self.n..(i + 1) * self.n] }
}
