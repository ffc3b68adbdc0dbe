//! Extract command - run one batch of payroll PDFs through the model.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use folha_core::export::{export_filename, render_table, to_csv, to_json, ExportFormat};
use folha_core::extraction::{GeminiExtractor, PayrollExtractor};
use folha_core::models::document::{media_type_of, Document, PDF_MEDIA_TYPE};
use folha_core::models::payroll::PayrollRecord;
use folha_core::{BatchReport, ExtractionSession};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: extracao_folha_<date>.csv for CSV, stdout otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the CSV export
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Check extracted records and report issues
    #[arg(long)]
    validate: bool,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Provider API base URL
    #[arg(long)]
    endpoint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Semicolon-delimited CSV file
    Csv,
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => OutputFormat::Csv,
            ExportFormat::Json => OutputFormat::Json,
            ExportFormat::Table => OutputFormat::Table,
        }
    }
}

/// Advances a progress bar as each document is extracted.
struct ProgressExtractor<E> {
    inner: E,
    pb: ProgressBar,
}

#[async_trait]
impl<E: PayrollExtractor> PayrollExtractor for ProgressExtractor<E> {
    async fn extract(&self, document: &Document) -> folha_core::Result<Vec<PayrollRecord>> {
        self.pb.set_message(format!("Extracting {}", document.name));
        let result = self.inner.extract(document).await;
        self.pb.inc(1);
        result
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let paths = collect_inputs(&args.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("No files found for: {}", args.inputs.join(", "));
    }

    let candidates = read_pdf_inputs(&paths)?;
    let pdf_count = candidates.len();
    debug!("{} of {} inputs are PDF files", pdf_count, paths.len());

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from(config.export.format));
    let status = StatusOutput {
        stderr: args.output.is_none() && format != OutputFormat::Csv,
    };

    let mut provider = config.provider.clone();
    if let Some(api_key) = args.api_key.clone() {
        provider = provider.with_api_key(api_key);
    }
    if let Some(model) = args.model.clone() {
        provider = provider.with_model(model);
    }
    if let Some(endpoint) = args.endpoint.clone() {
        provider = provider.with_endpoint(endpoint);
    }

    let pb = ProgressBar::new(pdf_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let extractor = ProgressExtractor {
        inner: GeminiExtractor::new(provider)?,
        pb: pb.clone(),
    };
    let mut session = ExtractionSession::new(extractor);

    let outcome = session.submit(candidates).await;
    let report = match outcome {
        Ok(Some(report)) => {
            pb.finish_with_message("Done");
            report
        }
        Ok(None) => {
            pb.finish_and_clear();
            anyhow::bail!("No PDF files among the inputs");
        }
        Err(e) => {
            pb.abandon();
            let message = session
                .last_error()
                .map(str::to_string)
                .unwrap_or_else(|| e.user_message());
            anyhow::bail!(message);
        }
    };

    status.line(style("Selected files:").bold());
    for doc in session.collector().selected() {
        status.line(format!("  - {}", doc.name));
    }

    let records = session.results();

    if args.validate {
        report_issues(records);
    }

    if records.is_empty() && format == OutputFormat::Csv {
        status.line(format!("{} No records extracted", style("ℹ").blue()));
        print_summary(status, &report);
        return Ok(());
    }

    match format {
        OutputFormat::Csv => {
            let path = match &args.output {
                Some(path) => path.clone(),
                None => {
                    let dir = args
                        .output_dir
                        .clone()
                        .or_else(|| config.export.output_dir.clone())
                        .unwrap_or_else(|| PathBuf::from("."));
                    fs::create_dir_all(&dir)?;
                    dir.join(export_filename(chrono::Local::now().date_naive()))
                }
            };
            fs::write(&path, to_csv(records)?)?;
            println!(
                "{} Exported {} records to {}",
                style("✓").green(),
                records.len(),
                path.display()
            );
        }
        OutputFormat::Json => write_or_print(args.output.as_deref(), &to_json(records)?)?,
        OutputFormat::Table => write_or_print(args.output.as_deref(), &render_table(records))?,
    }

    print_summary(status, &report);

    Ok(())
}

/// Destination of progress and summary lines.
///
/// When the records themselves go to stdout, status lines move to stderr so
/// the output stays parseable.
#[derive(Clone, Copy)]
struct StatusOutput {
    stderr: bool,
}

impl StatusOutput {
    fn line(self, text: impl std::fmt::Display) {
        if self.stderr {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

/// Expand inputs into file paths, keeping the order they were given in.
///
/// Existing paths are taken as-is; anything else is treated as a glob pattern.
fn collect_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            paths.push(path.to_path_buf());
            continue;
        }

        let matches: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();

        if matches.is_empty() {
            warn!("No files match {}", input);
        }
        paths.extend(matches);
    }

    Ok(paths)
}

/// Read the inputs whose extension declares a PDF.
///
/// Other inputs are skipped without being opened.
fn read_pdf_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<Document>> {
    let mut documents = Vec::new();

    for path in paths {
        let media_type = media_type_of(path);
        if media_type != PDF_MEDIA_TYPE {
            debug!("Skipping {} ({})", path.display(), media_type);
            continue;
        }
        let document = Document::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(document);
    }

    Ok(documents)
}

fn write_or_print(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn report_issues(records: &[PayrollRecord]) {
    let mut total = 0;

    for (i, record) in records.iter().enumerate() {
        let issues = record.validate();
        if issues.is_empty() {
            continue;
        }
        total += issues.len();
        eprintln!(
            "{}",
            style(format!("Row {} ({} {}):", i + 1, record.id, record.nome)).yellow()
        );
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
    }

    if total == 0 {
        eprintln!("{} All records passed validation", style("✓").green());
    }
}

fn print_summary(status: StatusOutput, report: &BatchReport) {
    status.line("");
    status.line(format!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.documents,
        report.elapsed
    ));
    status.line(format!("   {} records extracted", style(report.records).green()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_inputs_mixes_paths_and_globs() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let explicit = dir.path().join("notes.txt").display().to_string();
        let pattern = dir.path().join("*.pdf").display().to_string();

        let paths = collect_inputs(&[explicit, pattern]).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["notes.txt", "a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_only_pdf_inputs_are_read() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("janeiro.pdf");
        fs::write(&pdf, b"%PDF-1.4").unwrap();
        // Never created: reading it would fail
        let missing_image = dir.path().join("scan.png");

        let documents = read_pdf_inputs(&[missing_image, pdf]).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "janeiro.pdf");
        assert_eq!(documents[0].data, b"%PDF-1.4");
    }

    #[test]
    fn test_unreadable_pdf_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing_pdf = dir.path().join("missing.pdf");
        assert!(read_pdf_inputs(&[missing_pdf]).is_err());
    }

    #[test]
    fn test_unmatched_pattern_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.pdf").display().to_string();
        assert!(collect_inputs(&[pattern]).unwrap().is_empty());
    }
}
