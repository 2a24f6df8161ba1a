//! Occupational taxonomy reference data.
//!
//! A taxonomy version consists of two tables: the taxonomy itself (code to
//! display name) and an alias table mapping free-text labels to codes. Both
//! are read-only once loaded.

pub mod loader;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

pub use loader::{CsvReferenceData, InMemoryReferenceData, ReferenceDataSource};

/// One node of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub code: String,
    pub name: String,
}

impl TaxonomyEntry {
    pub fn new(code: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            code: canonical_code(code.as_ref()),
            name: name.into(),
        }
    }
}

/// A free-text label known to correspond to one taxonomy code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub code: String,
    /// Display name of `code`, denormalized from the taxonomy.
    pub name: String,
}

impl AliasEntry {
    pub fn new(alias: impl Into<String>, code: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            code: canonical_code(code.as_ref()),
            name: name.into(),
        }
    }
}

/// The code-to-name table of one taxonomy version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    version: String,
    names: BTreeMap<String, String>,
}

impl Taxonomy {
    /// Build from entries. A code listed twice keeps its first name.
    pub fn new(version: impl Into<String>, entries: impl IntoIterator<Item = TaxonomyEntry>) -> Self {
        let mut names = BTreeMap::new();
        for entry in entries {
            if entry.code.is_empty() {
                continue;
            }
            names.entry(entry.code).or_insert(entry.name);
        }
        Self {
            version: version.into(),
            names,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Display name for an exact code.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in code order.
    pub fn entries(&self) -> impl Iterator<Item = TaxonomyEntry> + '_ {
        self.names.iter().map(|(code, name)| TaxonomyEntry {
            code: code.clone(),
            name: name.clone(),
        })
    }
}

/// Strip segment separators and whitespace: `2-06-07-02` becomes `2060702`.
pub fn canonical_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Alias text as stored in the index: trimmed and lower-cased.
pub fn clean_alias(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Turn raw alias rows into the ordered, de-duplicated alias list of a
/// reference index.
///
/// With `complete` set, every taxonomy display name is added as an alias of
/// its own code, ahead of the supplied aliases. Empty aliases and aliases with
/// an empty code are dropped. The first occurrence of an alias text wins.
/// Missing display names are filled in from the taxonomy.
pub fn prepare_aliases(
    taxonomy: &Taxonomy,
    aliases: impl IntoIterator<Item = AliasEntry>,
    complete: bool,
) -> Vec<AliasEntry> {
    let canonical: Vec<AliasEntry> = if complete {
        taxonomy
            .entries()
            .map(|e| AliasEntry {
                alias: e.name.clone(),
                code: e.code,
                name: e.name,
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut seen = HashSet::new();
    let mut prepared = Vec::new();
    for mut entry in canonical.into_iter().chain(aliases) {
        entry.alias = clean_alias(&entry.alias);
        entry.code = canonical_code(&entry.code);
        if entry.alias.is_empty() || entry.code.is_empty() {
            continue;
        }
        if !seen.insert(entry.alias.clone()) {
            continue;
        }
        if entry.name.trim().is_empty()
            && let Some(name) = taxonomy.name(&entry.code)
        {
            entry.name = name.to_string();
        }
        prepared.push(entry);
    }
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(
            "test",
            vec![
                TaxonomyEntry::new("2-02-10-03", "软件工程技术人员"),
                TaxonomyEntry::new("2-06-07-02", "会计专业人员"),
                TaxonomyEntry::new("2-06-07-02", "duplicate"),
            ],
        )
    }

    #[test]
    fn test_canonical_code() {
        assert_eq!(canonical_code("2-06-07-02"), "2060702");
        assert_eq!(canonical_code(" 2 060702 "), "2060702");
        assert_eq!(canonical_code("2060702"), "2060702");
    }

    #[test]
    fn test_taxonomy_lookup() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.name("2060702"), Some("会计专业人员"));
        assert_eq!(taxonomy.name("2060000"), None);
        assert!(taxonomy.contains("2021003"));
    }

    #[test]
    fn test_prepare_aliases_dedupes_and_cleans() {
        let aliases = vec![
            AliasEntry::new("  Java工程师 ", "2-02-10-03", ""),
            AliasEntry::new("java工程师", "2060702", "会计专业人员"),
            AliasEntry::new("   ", "2060702", ""),
            AliasEntry::new("出纳", "", ""),
            AliasEntry::new("会计", "2060702", ""),
        ];
        let prepared = prepare_aliases(&taxonomy(), aliases, false);
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].alias, "java工程师");
        assert_eq!(prepared[0].code, "2021003");
        assert_eq!(prepared[0].name, "软件工程技术人员");
        assert_eq!(prepared[1].alias, "会计");
    }

    #[test]
    fn test_prepare_aliases_completes_with_names_first() {
        let aliases = vec![AliasEntry::new("会计专业人员", "9999999", "other")];
        let prepared = prepare_aliases(&taxonomy(), aliases, true);
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].alias, "软件工程技术人员");
        assert_eq!(prepared[1].alias, "会计专业人员");
        assert_eq!(prepared[1].code, "2060702");
    }
}
