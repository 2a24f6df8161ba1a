//! Reference data sources.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};

use crate::error::{OccucodeError, Result};
use crate::taxonomy::{AliasEntry, Taxonomy, TaxonomyEntry};

const TAXONOMY_CODE_COLUMNS: &[&str] = &["code_num", "code"];
const TAXONOMY_NAME_COLUMNS: &[&str] = &["name", "title"];
const ALIAS_TEXT_COLUMNS: &[&str] = &["alias"];
const ALIAS_CODE_COLUMNS: &[&str] = &["csco_code_num", "code_num", "csco_code", "code"];
const ALIAS_NAME_COLUMNS: &[&str] = &["csco_name", "name"];

/// Supplies the taxonomy and alias tables of a taxonomy version.
///
/// Implementations return [`OccucodeError::MissingReferenceData`] when the
/// version is unknown.
pub trait ReferenceDataSource: Send + Sync {
    fn load_taxonomy(&self, version: &str) -> Result<Taxonomy>;

    /// Raw alias rows. Cleaning and de-duplication happen in
    /// [`prepare_aliases`](crate::taxonomy::prepare_aliases).
    fn load_aliases(&self, version: &str) -> Result<Vec<AliasEntry>>;
}

/// Reads `{version}.csv` and `{version}_aliases.csv` from a directory.
///
/// The taxonomy table needs a code column (`code_num` or `code`) and a name
/// column (`name` or `title`). The alias table needs `alias`, a code column
/// (`csco_code_num`, `code_num`, `csco_code` or `code`) and optionally a name
/// column (`csco_name` or `name`). Extra columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvReferenceData {
    data_dir: PathBuf,
}

impl CsvReferenceData {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn taxonomy_path(&self, version: &str) -> PathBuf {
        self.data_dir.join(format!("{version}.csv"))
    }

    pub fn aliases_path(&self, version: &str) -> PathBuf {
        self.data_dir.join(format!("{version}_aliases.csv"))
    }
}

impl ReferenceDataSource for CsvReferenceData {
    fn load_taxonomy(&self, version: &str) -> Result<Taxonomy> {
        let path = self.taxonomy_path(version);
        let entries = read_table(&path, |table| {
            let code = table.column(TAXONOMY_CODE_COLUMNS)?;
            let name = table.column(TAXONOMY_NAME_COLUMNS)?;
            Ok(move |record: &StringRecord| {
                Some(TaxonomyEntry::new(
                    record.get(code)?,
                    record.get(name).unwrap_or_default(),
                ))
            })
        })?;
        debug!("loaded {} taxonomy rows from {}", entries.len(), path.display());
        Ok(Taxonomy::new(version, entries))
    }

    fn load_aliases(&self, version: &str) -> Result<Vec<AliasEntry>> {
        let path = self.aliases_path(version);
        let aliases = read_table(&path, |table| {
            let alias = table.column(ALIAS_TEXT_COLUMNS)?;
            let code = table.column(ALIAS_CODE_COLUMNS)?;
            let name = table.optional_column(ALIAS_NAME_COLUMNS);
            Ok(move |record: &StringRecord| {
                Some(AliasEntry::new(
                    record.get(alias)?,
                    record.get(code)?,
                    name.and_then(|i| record.get(i)).unwrap_or_default(),
                ))
            })
        })?;
        debug!("loaded {} alias rows from {}", aliases.len(), path.display());
        Ok(aliases)
    }
}

/// Header of a reference table, used to locate columns by name.
struct TableHeader<'a> {
    path: &'a Path,
    headers: StringRecord,
}

impl TableHeader<'_> {
    /// Index of the first header matching one of `names`.
    fn optional_column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == *name))
    }

    fn column(&self, names: &[&str]) -> Result<usize> {
        self.optional_column(names).ok_or_else(|| {
            OccucodeError::invalid_input(format!(
                "{}: none of the columns {names:?} found",
                self.path.display()
            ))
        })
    }
}

fn open_table(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            OccucodeError::missing_reference_data(format!("{} not found", path.display()))
        }
        _ => OccucodeError::Io(e),
    })
}

/// Read a CSV file, mapping each row with the function produced by `layout`.
/// Rows that fail to parse, or that the row function rejects, are skipped.
fn read_table<T, F, M>(path: &Path, layout: M) -> Result<Vec<T>>
where
    M: FnOnce(&TableHeader<'_>) -> Result<F>,
    F: Fn(&StringRecord) -> Option<T>,
{
    read_table_from(path, open_table(path)?, layout)
}

fn read_table_from<R, T, F, M>(path: &Path, reader: R, layout: M) -> Result<Vec<T>>
where
    R: Read,
    M: FnOnce(&TableHeader<'_>) -> Result<F>,
    F: Fn(&StringRecord) -> Option<T>,
{
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = TableHeader {
        path,
        headers: reader.headers()?.clone(),
    };
    let row = layout(&header)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                if let Some(value) = row(&record) {
                    rows.push(value);
                }
            }
            // Header is line 1.
            Err(e) => warn!("{}: skipping row {}: {e}", path.display(), line + 2),
        }
    }
    Ok(rows)
}

/// Reference data held in memory, keyed by version.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    versions: HashMap<String, (Vec<TaxonomyEntry>, Vec<AliasEntry>)>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a version.
    pub fn with_version(
        mut self,
        version: impl Into<String>,
        taxonomy: Vec<TaxonomyEntry>,
        aliases: Vec<AliasEntry>,
    ) -> Self {
        self.versions.insert(version.into(), (taxonomy, aliases));
        self
    }

    fn version(&self, version: &str) -> Result<&(Vec<TaxonomyEntry>, Vec<AliasEntry>)> {
        self.versions.get(version).ok_or_else(|| {
            OccucodeError::missing_reference_data(format!("no reference data for version {version}"))
        })
    }
}

impl ReferenceDataSource for InMemoryReferenceData {
    fn load_taxonomy(&self, version: &str) -> Result<Taxonomy> {
        let (taxonomy, _) = self.version(version)?;
        Ok(Taxonomy::new(version, taxonomy.iter().cloned()))
    }

    fn load_aliases(&self, version: &str) -> Result<Vec<AliasEntry>> {
        let (_, aliases) = self.version(version)?;
        Ok(aliases.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_csv_reference_data() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "v1.csv",
            "code,code_num,name\n2-06-07-02,2060702,会计专业人员\n4-03-02-05,4030205,餐厅服务员\n",
        );
        write(
            dir.path(),
            "v1_aliases.csv",
            "alias,csco_code,csco_name\n会计,2-06-07-02,会计专业人员\n服务员,4-03-02-05,\n",
        );

        let source = CsvReferenceData::new(dir.path());
        let taxonomy = source.load_taxonomy("v1").unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.name("4030205"), Some("餐厅服务员"));

        let aliases = source.load_aliases("v1").unwrap();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].code, "2060702");
        assert_eq!(aliases[1].name, "");
    }

    #[test]
    fn test_missing_file_is_missing_reference_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvReferenceData::new(dir.path());
        assert!(matches!(
            source.load_taxonomy("nope"),
            Err(OccucodeError::MissingReferenceData(_))
        ));
        assert!(matches!(
            source.load_aliases("nope"),
            Err(OccucodeError::MissingReferenceData(_))
        ));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "v1_aliases.csv", "label,code\n会计,2060702\n");
        let source = CsvReferenceData::new(dir.path());
        assert!(matches!(
            source.load_aliases("v1"),
            Err(OccucodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_title_column_and_short_rows() {
        let rows = read_table_from(
            Path::new("inline.csv"),
            "code,title\n1000000,负责人\n2000000\n".as_bytes(),
            |table| {
                let code = table.column(TAXONOMY_CODE_COLUMNS)?;
                let name = table.column(TAXONOMY_NAME_COLUMNS)?;
                Ok(move |r: &StringRecord| Some((r.get(code)?.to_string(), r.get(name)?.to_string())))
            },
        )
        .unwrap();
        assert_eq!(rows, vec![("1000000".to_string(), "负责人".to_string())]);
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemoryReferenceData::new().with_version(
            "v1",
            vec![TaxonomyEntry::new("2060702", "会计专业人员")],
            vec![AliasEntry::new("会计", "2060702", "会计专业人员")],
        );
        assert_eq!(source.load_taxonomy("v1").unwrap().len(), 1);
        assert_eq!(source.load_aliases("v1").unwrap().len(), 1);
        assert!(matches!(
            source.load_aliases("v2"),
            Err(OccucodeError::MissingReferenceData(_))
        ));
    }
}
