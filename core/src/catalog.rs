//! Loading movie records from JSON / JSONL and turning them into [`Item`]s.

use crate::config::Weighting;
use crate::error::RecommendError;
use crate::index::Item;
use crate::soup::create_soup;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// A credited name: either a bare string or an object with a `name`
/// (and for crew, a `job`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Named {
    Name(String),
    Entry {
        name: String,
        #[serde(default)]
        job: Option<String>,
    },
}

impl Named {
    pub fn name(&self) -> &str {
        match self {
            Named::Name(name) | Named::Entry { name, .. } => name,
        }
    }

    pub fn job(&self) -> Option<&str> {
        match self {
            Named::Name(_) => None,
            Named::Entry { job, .. } => job.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub cast: Vec<Named>,
    #[serde(default)]
    pub crew: Vec<Named>,
    #[serde(default)]
    pub keywords: Vec<Named>,
    #[serde(default)]
    pub genres: Vec<Named>,
}

/// Which field of a record becomes the item's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentSource {
    #[default]
    Plot,
    Soup,
}

impl DocumentSource {
    /// Free text wants tf-idf; tag soups want raw counts.
    pub fn default_weighting(self) -> Weighting {
        match self {
            DocumentSource::Plot => Weighting::TfIdf,
            DocumentSource::Soup => Weighting::Count,
        }
    }
}

impl FromStr for DocumentSource {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plot" | "overview" => Ok(DocumentSource::Plot),
            "soup" | "metadata" => Ok(DocumentSource::Soup),
            other => Err(RecommendError::MalformedConfiguration(format!(
                "unknown document source '{other}' (expected 'plot' or 'soup')"
            ))),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Plot => f.write_str("plot"),
            DocumentSource::Soup => f.write_str("soup"),
        }
    }
}

pub fn items_from_records(records: &[MovieRecord], source: DocumentSource) -> Vec<Item> {
    records
        .iter()
        .map(|r| {
            let document = match source {
                DocumentSource::Plot => r.overview.clone().unwrap_or_default(),
                DocumentSource::Soup => create_soup(r),
            };
            Item { title: r.title.clone(), document }
        })
        .collect()
}

/// Read records from a `.json` file, a `.jsonl` file, or a directory of them.
/// Directory entries are visited in sorted path order.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<MovieRecord>> {
    let input_path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("catalog path {} does not exist", input_path.display());
    }

    let mut records = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut records)?;
        } else {
            read_json(&file, &mut records)?;
        }
    }
    tracing::debug!(records = records.len(), path = %input_path.display(), "loaded catalog");
    Ok(records)
}

fn read_jsonl(file: &Path, records: &mut Vec<MovieRecord>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record: MovieRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        records.push(record);
    }
    Ok(())
}

fn read_json(file: &Path, records: &mut Vec<MovieRecord>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for (i, v) in arr.into_iter().enumerate() {
                let record: MovieRecord = serde_json::from_value(v)
                    .with_context(|| format!("{}[{i}]", file.display()))?;
                records.push(record);
            }
        }
        serde_json::Value::Object(_) => {
            let record: MovieRecord = serde_json::from_value(json)
                .with_context(|| format!("{}", file.display()))?;
            records.push(record);
        }
        _ => tracing::warn!(file = %file.display(), "skipping JSON that is neither an object nor an array"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_accept_strings_and_objects() {
        let r: MovieRecord = serde_json::from_str(
            r#"{"title":"Heat","cast":["Al Pacino",{"id":2,"name":"Robert De Niro"}],
                "crew":[{"name":"Michael Mann","job":"Director","department":"Directing"}]}"#,
        )
        .unwrap();
        assert_eq!(r.cast[0].name(), "Al Pacino");
        assert_eq!(r.cast[1].name(), "Robert De Niro");
        assert_eq!(r.crew[0].job(), Some("Director"));
        assert!(r.overview.is_none());
    }

    #[test]
    fn missing_overview_is_empty_document() {
        let records = vec![MovieRecord { title: "Blank".into(), ..Default::default() }];
        let items = items_from_records(&records, DocumentSource::Plot);
        assert_eq!(items[0].document, "");
    }

    #[test]
    fn bad_array_element_names_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, r#"[{"title":"Heat"},{"overview":"no title here"}]"#).unwrap();
        let err = load_records(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.ends_with("movies.json[1]"), "{msg}");
    }

    #[test]
    fn parses_document_source() {
        assert_eq!("soup".parse::<DocumentSource>().unwrap(), DocumentSource::Soup);
        assert_eq!("Plot".parse::<DocumentSource>().unwrap(), DocumentSource::Plot);
        assert!("cast".parse::<DocumentSource>().is_err());
    }
}
