//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClassificationRecord, ClassifiedTitle, flatten};
use crate::cli::args::{OccucodeArgs, OutputFormat};
use crate::error::Result;

/// A raw title and its normalized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedTitle {
    pub input: String,
    pub normalized: String,
}

/// Reference index statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub version: String,
    pub aliases: usize,
    pub codes: usize,
    pub dimension: usize,
    pub embedder: String,
    pub build_ms: u64,
}

/// Classification results, either one row per match or nested per input.
#[derive(Debug, Clone)]
pub enum ClassificationReport {
    Records(Vec<ClassificationRecord>),
    Grouped(Vec<ClassifiedTitle>),
}

impl ClassificationReport {
    pub fn new(results: Vec<ClassifiedTitle>, grouped: bool) -> Self {
        if grouped {
            Self::Grouped(results)
        } else {
            Self::Records(flatten(&results))
        }
    }
}

/// A result the CLI knows how to print.
pub trait Report {
    fn write_json(&self, out: &mut dyn Write, pretty: bool) -> Result<()>;
    fn write_csv(&self, out: &mut dyn Write) -> Result<()>;
    fn write_human(&self, out: &mut dyn Write) -> Result<()>;
}

/// Output a result in the specified format.
pub fn output_result<R: Report + ?Sized>(
    report: &R,
    args: &OccucodeArgs,
    out: &mut dyn Write,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => report.write_human(out)?,
        OutputFormat::Json => report.write_json(out, args.pretty)?,
        OutputFormat::Csv => report.write_csv(out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_json_value<T: Serialize + ?Sized>(value: &T, out: &mut dyn Write, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_csv_rows<T: Serialize>(rows: &[T], out: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn display_name(name: Option<&str>) -> &str {
    name.unwrap_or("unknown")
}

impl Report for Vec<CleanedTitle> {
    fn write_json(&self, out: &mut dyn Write, pretty: bool) -> Result<()> {
        write_json_value(self, out, pretty)
    }

    fn write_csv(&self, out: &mut dyn Write) -> Result<()> {
        write_csv_rows(self, out)
    }

    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        for title in self {
            writeln!(out, "{} => {}", title.input, title.normalized)?;
        }
        Ok(())
    }
}

impl Report for IndexInfo {
    fn write_json(&self, out: &mut dyn Write, pretty: bool) -> Result<()> {
        write_json_value(self, out, pretty)
    }

    fn write_csv(&self, out: &mut dyn Write) -> Result<()> {
        write_csv_rows(std::slice::from_ref(self), out)
    }

    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Reference Index:")?;
        writeln!(out, "════════════════")?;
        writeln!(out, "Version: {}", self.version)?;
        writeln!(out, "Aliases: {}", self.aliases)?;
        writeln!(out, "Codes: {}", self.codes)?;
        writeln!(out, "Dimension: {}", self.dimension)?;
        writeln!(out, "Embedder: {}", self.embedder)?;
        writeln!(out, "Build time: {}ms", self.build_ms)?;
        Ok(())
    }
}

impl Report for ClassificationReport {
    fn write_json(&self, out: &mut dyn Write, pretty: bool) -> Result<()> {
        match self {
            Self::Records(records) => write_json_value(records, out, pretty),
            Self::Grouped(results) => write_json_value(results, out, pretty),
        }
    }

    fn write_csv(&self, out: &mut dyn Write) -> Result<()> {
        // CSV cannot nest, so grouped results are written flat as well.
        match self {
            Self::Records(records) => write_csv_rows(records, out),
            Self::Grouped(results) => write_csv_rows(&flatten(results), out),
        }
    }

    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        match self {
            Self::Records(records) => {
                for record in records {
                    let input = record.input.as_deref().unwrap_or("");
                    match (&record.code, record.similarity) {
                        (Some(code), Some(similarity)) => writeln!(
                            out,
                            "{input}\t{code}\t{}\t{similarity:.4}",
                            display_name(record.name.as_deref())
                        )?,
                        _ => writeln!(out, "{input}\t-")?,
                    }
                }
            }
            Self::Grouped(results) => {
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    writeln!(
                        out,
                        "{} [{}]",
                        result.input.as_deref().unwrap_or(""),
                        result.normalized
                    )?;
                    if result.matches.is_empty() {
                        writeln!(out, "  (no match)")?;
                    }
                    for (rank, m) in result.matches.iter().enumerate() {
                        writeln!(
                            out,
                            "  {}. {} {} ({:.4}) via \"{}\"",
                            rank + 1,
                            m.code,
                            display_name(m.name.as_deref()),
                            m.similarity,
                            m.alias
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MatchResult;

    fn results() -> Vec<ClassifiedTitle> {
        vec![
            ClassifiedTitle {
                input: Some("急招会计".into()),
                normalized: "会计".into(),
                matches: vec![MatchResult {
                    code: "2060702".into(),
                    name: Some("会计专业人员".into()),
                    similarity: 0.9876,
                    alias: "会计".into(),
                    alias_code: "2060702".into(),
                }],
            },
            ClassifiedTitle {
                input: Some("北京市".into()),
                normalized: String::new(),
                matches: vec![],
            },
        ]
    }

    fn render(report: &dyn Report, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        match format {
            OutputFormat::Human => report.write_human(&mut buf).unwrap(),
            OutputFormat::Json => report.write_json(&mut buf, false).unwrap(),
            OutputFormat::Csv => report.write_csv(&mut buf).unwrap(),
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_records_csv() {
        let report = ClassificationReport::new(results(), false);
        assert_eq!(
            render(&report, OutputFormat::Csv),
            "input,code,name,similarity\n急招会计,2060702,会计专业人员,0.9876\n北京市,,,\n"
        );
    }

    #[test]
    fn test_records_human() {
        let report = ClassificationReport::new(results(), false);
        assert_eq!(
            render(&report, OutputFormat::Human),
            "急招会计\t2060702\t会计专业人员\t0.9876\n北京市\t-\n"
        );
    }

    #[test]
    fn test_grouped_json() {
        let report = ClassificationReport::new(results(), true);
        let value: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json)).unwrap();
        assert_eq!(value[0]["normalized"], "会计");
        assert_eq!(value[0]["matches"][0]["alias_code"], "2060702");
        assert_eq!(value[1]["matches"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_cleaned_human() {
        let cleaned = vec![CleanedTitle {
            input: "急招会计".into(),
            normalized: "会计".into(),
        }];
        assert_eq!(render(&cleaned, OutputFormat::Human), "急招会计 => 会计\n");
    }
}
