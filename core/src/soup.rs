//! Metadata soups: cast, director, genres and keywords folded into one
//! document of cleaned tokens, for count-weighted similarity.

use crate::catalog::{MovieRecord, Named};

/// How many names to keep from each of cast, keywords and genres.
pub const TOP_NAMES: usize = 3;

/// Lowercase and drop all whitespace, so "Johnny Depp" and "Johnny Galecki"
/// become distinct single tokens.
pub fn clean_token(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

/// Name of the first crew member credited as director, or "".
pub fn director(crew: &[Named]) -> &str {
    crew.iter()
        .find(|m| m.job() == Some("Director"))
        .map(Named::name)
        .unwrap_or("")
}

pub fn top_names(list: &[Named], n: usize) -> Vec<&str> {
    list.iter().take(n).map(Named::name).collect()
}

/// keywords, cast, director, genres; cleaned and space-joined.
pub fn create_soup(record: &MovieRecord) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.extend(top_names(&record.keywords, TOP_NAMES).into_iter().map(clean_token));
    parts.extend(top_names(&record.cast, TOP_NAMES).into_iter().map(clean_token));
    parts.push(clean_token(director(&record.crew)));
    parts.extend(top_names(&record.genres, TOP_NAMES).into_iter().map(clean_token));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Named> {
        names.iter().map(|n| Named::Name(n.to_string())).collect()
    }

    #[test]
    fn clean_token_joins_names() {
        assert_eq!(clean_token("Johnny Depp"), "johnnydepp");
        assert_eq!(clean_token("  Science Fiction "), "sciencefiction");
    }

    #[test]
    fn director_comes_from_crew_job() {
        let crew = vec![
            Named::Entry { name: "Hans Zimmer".into(), job: Some("Original Music Composer".into()) },
            Named::Entry { name: "Christopher Nolan".into(), job: Some("Director".into()) },
        ];
        assert_eq!(director(&crew), "Christopher Nolan");
        assert_eq!(director(&[]), "");
    }

    #[test]
    fn soup_uses_top_three_of_each_list() {
        let record = MovieRecord {
            title: "Inception".into(),
            overview: None,
            cast: named(&["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Ellen Page", "Tom Hardy"]),
            crew: vec![Named::Entry { name: "Christopher Nolan".into(), job: Some("Director".into()) }],
            keywords: named(&["dream", "subconscious"]),
            genres: named(&["Action", "Science Fiction", "Adventure", "Thriller"]),
        };
        assert_eq!(
            create_soup(&record),
            "dream subconscious leonardodicaprio josephgordon-levitt ellenpage christophernolan action sciencefiction adventure"
        );
    }

    #[test]
    fn soup_skips_missing_parts() {
        let record = MovieRecord { title: "Untitled".into(), genres: named(&["Drama"]), ..Default::default() };
        assert_eq!(create_soup(&record), "drama");
    }
}
