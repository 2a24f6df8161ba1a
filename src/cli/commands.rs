//! Command implementations for the occucode CLI.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::analysis::normalizer::JobTitleNormalizer;
use crate::classifier::{ClassifierConfig, ClassifyInput, OccupationClassifier};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{OccucodeError, Result};

/// Execute a CLI command.
pub async fn execute_command(args: OccucodeArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Clean(clean_args) => clean_titles(clean_args, config, &args),
        Command::Classify(classify_args) => classify_title(classify_args, config, &args).await,
        Command::Batch(batch_args) => classify_batch(batch_args, config, &args).await,
        Command::IndexInfo(info_args) => index_info(info_args, config, &args).await,
    }
}

/// Load the configuration file, if any, and apply command line overrides.
pub fn load_config(args: &OccucodeArgs) -> Result<ClassifierConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            ClassifierConfig::from_file(path)?
        }
        None => ClassifierConfig::default(),
    };
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    Ok(config)
}

/// Normalize titles.
fn clean_titles(args: &CleanArgs, config: ClassifierConfig, cli_args: &OccucodeArgs) -> Result<()> {
    let mut titles = args.titles.clone();
    if let Some(path) = &args.input {
        titles.extend(read_lines(path)?);
    }
    if titles.is_empty() {
        return Err(OccucodeError::invalid_input(
            "no titles given; pass them as arguments or with --input",
        ));
    }

    let normalizer = JobTitleNormalizer::from_config(&config.normalizer)?;
    let cleaned: Vec<CleanedTitle> = titles
        .into_iter()
        .map(|input| CleanedTitle {
            normalized: normalizer.normalize(&input),
            input,
        })
        .collect();

    output_result(&cleaned, cli_args, &mut io::stdout().lock())
}

/// Classify one title.
async fn classify_title(
    args: &ClassifyArgs,
    config: ClassifierConfig,
    cli_args: &OccucodeArgs,
) -> Result<()> {
    let classifier = OccupationClassifier::from_config(config)?;
    let options = args.matching.apply(classifier.default_options());

    let results = classifier
        .classify_many(ClassifyInput::Single(args.title.clone()), &options)
        .await?;

    let report = ClassificationReport::new(results, true);
    output_result(&report, cli_args, &mut io::stdout().lock())
}

/// Classify every title of an input file.
async fn classify_batch(
    args: &BatchArgs,
    config: ClassifierConfig,
    cli_args: &OccucodeArgs,
) -> Result<()> {
    let input = read_titles(&args.input, args.column.as_deref())?;
    info!("read {} titles from {}", input.len(), args.input.display());

    let classifier = OccupationClassifier::from_config(config)?;
    let mut options = args.matching.apply(classifier.default_options());
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }

    let start = Instant::now();
    let results = classifier.classify_many(input, &options).await?;
    info!(
        "classified {} titles in {:?}",
        results.len(),
        start.elapsed()
    );

    let report = ClassificationReport::new(results, args.grouped);
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            output_result(&report, cli_args, &mut out)?;
            if cli_args.verbosity() > 0 {
                eprintln!("Results written to {}", path.display());
            }
            Ok(())
        }
        None => output_result(&report, cli_args, &mut io::stdout().lock()),
    }
}

/// Build the reference index and print its statistics.
async fn index_info(
    args: &IndexInfoArgs,
    config: ClassifierConfig,
    cli_args: &OccucodeArgs,
) -> Result<()> {
    let version = args.taxonomy.clone().unwrap_or_else(|| config.version.clone());
    let classifier = OccupationClassifier::from_config(config)?;

    let start = Instant::now();
    let index = classifier.reference_index(&version).await?;
    let info = IndexInfo {
        version: index.version().to_string(),
        aliases: index.len(),
        codes: index.taxonomy().len(),
        dimension: index.dimension(),
        embedder: classifier.config().embedder.display_name(),
        build_ms: start.elapsed().as_millis() as u64,
    };

    output_result(&info, cli_args, &mut io::stdout().lock())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    reader
        .lines()
        .map(|line| line.map_err(OccucodeError::from))
        .collect()
}

/// Read titles from a text, CSV or JSON file, chosen by extension.
pub fn read_titles(path: &Path, column: Option<&str>) -> Result<ClassifyInput> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            ClassifyInput::from_json(value)
        }
        Some("csv") => read_csv_column(path, column),
        _ => {
            if column.is_some() {
                return Err(OccucodeError::invalid_input(
                    "--column only applies to CSV input",
                ));
            }
            Ok(ClassifyInput::Sequence(read_lines(path)?))
        }
    }
}

fn read_csv_column(path: &Path, column: Option<&str>) -> Result<ClassifyInput> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(File::open(path)?);

    let index = match column {
        Some(name) => reader
            .headers()?
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                OccucodeError::invalid_input(format!(
                    "column {name:?} not found in {}",
                    path.display()
                ))
            })?,
        None => 0,
    };

    let mut titles = Vec::new();
    for record in reader.records() {
        let record = record?;
        titles.push(
            record
                .get(index)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string),
        );
    }
    Ok(ClassifyInput::Series(titles))
}
