//! Static reference lists used by the normalizer.
//!
//! Two lists drive the dictionary stages: recruitment stop words and
//! administrative place names. Both ship with the crate (compiled in from
//! `data/`) and can be replaced by files at runtime.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::warn;

use crate::error::Result;

const BUILTIN_STOPWORDS: &str = include_str!("../../data/stopwords.txt");
const BUILTIN_GEO_ENTITIES: &str = include_str!("../../data/geo_entities.csv");

/// Columns read from a geographic entity table. Both full and short forms are
/// collected.
const GEO_COLUMNS: &[&str] = &["name", "short_name"];

static BUILTIN_LEXICON: LazyLock<Lexicon> = LazyLock::new(|| Lexicon {
    stopwords: parse_stopwords(BUILTIN_STOPWORDS),
    geo_entities: parse_geo_entities(BUILTIN_GEO_ENTITIES.as_bytes()).unwrap_or_else(|e| {
        warn!("built-in geographic entity table is unreadable: {e}");
        Vec::new()
    }),
});

/// Stop words and geographic entities, loaded once and shared by normalizers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    pub stopwords: Vec<String>,
    pub geo_entities: Vec<String>,
}

impl Lexicon {
    /// The lists bundled with the crate.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN_LEXICON
    }

    /// Load lists from files, falling back to the bundled list for any path
    /// that is `None`.
    pub fn from_paths(stopwords: Option<&Path>, geo_entities: Option<&Path>) -> Result<Self> {
        let builtin = Self::builtin();
        let stopwords = match stopwords {
            Some(path) => parse_stopwords(&fs::read_to_string(path)?),
            None => builtin.stopwords.clone(),
        };
        let geo_entities = match geo_entities {
            Some(path) => parse_geo_entities(fs::File::open(path)?)?,
            None => builtin.geo_entities.clone(),
        };
        Ok(Self {
            stopwords,
            geo_entities,
        })
    }

    /// Add stop words on top of the loaded list.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(words.into_iter().map(Into::into));
        self
    }
}

/// One term per line; blank lines and `#` comments are skipped.
pub fn parse_stopwords(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read the `name` and `short_name` columns of a CSV table.
///
/// A table without either header is treated as a single unnamed column.
pub fn parse_geo_entities<R: std::io::Read>(reader: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| GEO_COLUMNS.contains(h))
        .map(|(i, _)| i)
        .collect();

    let mut entities = Vec::new();
    if columns.is_empty() {
        // Headerless single-column list: the first line is an entity too.
        columns.push(0);
        if let Some(first) = headers.get(0) {
            entities.push(first.to_string());
        }
    }

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping geographic entity row {}: {e}", line + 2);
                continue;
            }
        };
        for &column in &columns {
            if let Some(value) = record.get(column) {
                entities.push(value.to_string());
            }
        }
    }

    entities.retain(|e| !e.is_empty());
    entities.sort();
    entities.dedup();
    Ok(entities)
}
