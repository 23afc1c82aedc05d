//! Content-based movie recommendations: vectorize item documents, build a
//! cosine similarity matrix once, then answer top-k neighbor queries against it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod rank;
pub mod similarity;
pub mod soup;
pub mod tokenizer;
pub mod vectorize;

pub use catalog::{items_from_records, load_records, DocumentSource, MovieRecord, Named};
pub use config::{ConfigFile, RecommenderConfig, StopWords, Weighting};
pub use error::{RecommendError, RecommendResult};
pub use index::{build_index, BuiltIndex, Item, TitleIndex};
pub use rank::{recommend, recommend_scored, Neighbor, DEFAULT_K};
pub use similarity::SimilarityMatrix;
pub use vectorize::{FeatureMatrix, TermId, Vectorizer};
