use crate::error::{RecommendError, RecommendResult};
use crate::index::BuiltIndex;
use serde::Serialize;

pub const DEFAULT_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub position: usize,
    pub title: String,
    pub score: f32,
}

/// Titles of the `k` items most similar to `title`, best first.
pub fn recommend(title: &str, index: &BuiltIndex, k: usize) -> RecommendResult<Vec<String>> {
    Ok(recommend_scored(title, index, k)?.into_iter().map(|n| n.title).collect())
}

/// Like [`recommend`], keeping positions and scores.
///
/// Ties keep catalog order, except that the query item always sorts first among
/// items tied with it. Exactly that one entry is skipped; other perfect
/// duplicates of the query stay in the result.
pub fn recommend_scored(title: &str, index: &BuiltIndex, k: usize) -> RecommendResult<Vec<Neighbor>> {
    if k == 0 {
        return Err(RecommendError::MalformedConfiguration("k must be positive".into()));
    }
    let position = index
        .titles()
        .get(title)
        .ok_or_else(|| RecommendError::UnknownTitle(title.to_string()))?;

    let ranked = ranked_row(index.similarity().row(position), position);
    let neighbors = ranked
        .into_iter()
        .skip(1)
        .take(k)
        .map(|(pos, score)| Neighbor { position: pos, title: index.item_titles()[pos].clone(), score })
        .collect();
    Ok(neighbors)
}

fn ranked_row(row: &[f32], position: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
    // stable: equal scores stay in position order
    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| (a.0 != position).cmp(&(b.0 != position)))
    });
    scored
}
