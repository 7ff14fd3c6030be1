//! The optimize command.
//!
//! ```text
//! paths ──collect──> jobs ──par_iter──> optimize ──> output dir | stdout
//!                                          │
//!                                          └──> report (JSON)
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use amp_optimizer::utils::hash::short_hash;
use amp_optimizer::{Configuration, ErrorCollection, Optimizer, debug, log};
use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;
use serde::Serialize;

use super::Cli;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "amp-optimizer.toml";

const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// =============================================================================
// Types
// =============================================================================

/// One document to optimize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Stdin,
    File {
        source: PathBuf,
        /// Path below the output directory.
        relative: PathBuf,
    },
}

impl Job {
    fn label(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File { source, .. } => source.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Optimized,
    /// Optimization failed and the input was written unchanged.
    Fallback,
    Failed,
}

/// Outcome of one job, as written to `--report`.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: Status,
    #[serde(skip_serializing_if = "ErrorCollection::is_empty")]
    pub diagnostics: ErrorCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Entry
// =============================================================================

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    debug!(
        "config";
        "transformers: {}",
        config
            .transformers()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let optimizer = Optimizer::new(Arc::new(config));

    let jobs = collect_jobs(&cli.paths)?;
    if cli.output.is_none() && jobs.len() > 1 {
        bail!("{} inputs need an output directory (--output <DIR>)", jobs.len());
    }

    let reports: Vec<FileReport> = jobs
        .par_iter()
        .map(|job| process(job, &optimizer, cli))
        .collect::<Result<_>>()?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(path, json).with_context(|| format!("failed to write report `{}`", path.display()))?;
    }

    let failed = reports.iter().filter(|r| r.status == Status::Failed).count();
    let fallback = reports.iter().filter(|r| r.status == Status::Fallback).count();
    if cli.output.is_some() {
        log!(
            "done";
            "{} optimized, {} fallback, {} failed",
            reports.len() - failed - fallback,
            fallback,
            failed
        );
    }
    if failed > 0 {
        bail!("{failed} of {} documents failed to optimize", reports.len());
    }
    Ok(())
}

/// Config file (explicit or default) plus command-line overrides,
/// validated once the overrides are in.
pub fn load_config(cli: &Cli) -> Result<Configuration> {
    let config = match &cli.config {
        Some(path) => Configuration::parse_path(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            Configuration::parse_path(Path::new(DEFAULT_CONFIG))?
        }
        None => Configuration::default(),
    };

    let config = match &cli.transformers {
        Some(listed) => config.with_transformer_order(listed),
        None => config,
    };
    let config = match cli.max_css_bytes {
        Some(max) => config.with_max_css_byte_count(max),
        None => config,
    };
    Ok(config.validated()?)
}

// =============================================================================
// Collection
// =============================================================================

/// Expand command-line paths into jobs. Directories yield their HTML
/// files, sorted for stable output.
pub fn collect_jobs(paths: &[PathBuf]) -> Result<Vec<Job>> {
    if paths.is_empty() {
        return Ok(vec![Job::Stdin]);
    }

    let mut jobs = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" {
            jobs.push(Job::Stdin);
        } else if path.is_dir() {
            for source in collect_html_files(path) {
                let relative = source.strip_prefix(path).unwrap_or(&source).to_path_buf();
                jobs.push(Job::File { source, relative });
            }
        } else if path.is_file() {
            let relative = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone());
            jobs.push(Job::File {
                source: path.clone(),
                relative,
            });
        } else {
            bail!("`{}` does not exist", path.display());
        }
    }
    Ok(jobs)
}

fn collect_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

// =============================================================================
// Processing
// =============================================================================

/// Optimize one job and write its result.
///
/// Only I/O problems are returned as `Err`; optimization failures end up
/// in the report.
fn process(job: &Job, optimizer: &Optimizer, cli: &Cli) -> Result<FileReport> {
    let label = job.label();
    let source = read_job(job)?;
    debug!("optimize"; "{} ({} bytes, {})", label, source.len(), short_hash(&source));

    let mut diagnostics = ErrorCollection::new();
    let (status, error, output) = match optimizer.optimize_bytes(&source, &mut diagnostics) {
        Ok(html) => (Status::Optimized, None, Some(html.into_bytes())),
        Err(err) if cli.fallback => {
            log!("warning"; "{}: {}, writing input unchanged", label, err);
            (Status::Fallback, Some(err.to_string()), Some(source))
        }
        Err(err) => {
            log!("error"; "{}: {}", label, err);
            (Status::Failed, Some(err.to_string()), None)
        }
    };

    for diagnostic in &diagnostics {
        log!("warning"; "{}: {}", label, diagnostic);
    }
    if let Some(bytes) = output {
        write_job(job, cli.output.as_deref(), &bytes)?;
    }

    Ok(FileReport {
        path: label,
        status,
        diagnostics,
        error,
    })
}

fn read_job(job: &Job) -> Result<Vec<u8>> {
    match job {
        Job::Stdin => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
        Job::File { source, .. } => {
            fs::read(source).with_context(|| format!("failed to read `{}`", source.display()))
        }
    }
}

fn write_job(job: &Job, output_dir: Option<&Path>, bytes: &[u8]) -> Result<()> {
    let target = match (job, output_dir) {
        (Job::File { relative, .. }, Some(dir)) => dir.join(relative),
        (Job::Stdin, Some(dir)) => dir.join("stdin.html"),
        (_, None) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            return stdout.flush().context("failed to write stdout");
        }
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(&target, bytes).with_context(|| format!("failed to write `{}`", target.display()))
}
