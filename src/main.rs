mod address;
mod corrections;
mod error;
mod layout;
mod model;
mod parser;
mod report;
mod settings;
mod source;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use address::PatternAddressParser;
use corrections::CorrectionRegistry;
use parser::{DocumentRun, Pipeline};
use report::BatchSummary;

#[derive(Parser)]
#[command(name = "minutes_licenses", about = "Business-license records from licensing board minutes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from a directory of documents (or a single file)
    Run {
        /// Directory of .txt / .jsonl documents
        #[arg(short, long, conflicts_with = "file")]
        dir: Option<PathBuf>,
        /// Single document
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output JSON path (default: settings, then all_licenses.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (default: settings, then one per core)
        #[arg(short = 'j', long)]
        workers: Option<usize>,
    },
    /// Print the corrected transactional-hearing section of a document
    Section {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print the accepted chunks of a document with their keys
    Chunks {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List the correction rules in execution order
    Rules,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load()?;
    let pipeline = Pipeline::new(CorrectionRegistry::builtin()?, Arc::new(PatternAddressParser))?;

    let result = match cli.command {
        Commands::Run {
            dir,
            file,
            output,
            workers,
        } => {
            let paths = match (dir, file) {
                (Some(dir), _) => list_documents(&dir)?,
                (None, Some(file)) => vec![file],
                (None, None) => bail!("either --dir or --file is required"),
            };
            if paths.is_empty() {
                println!("No .txt or .jsonl documents found.");
            }
            let output = output.unwrap_or(settings.output);
            let workers = workers.or(settings.workers);

            println!("Processing {} documents...", paths.len());
            let runs = process_documents(&pipeline, &paths, workers)?;
            write_records(&output, &runs)?;
            println!("Wrote {}", output.display());

            BatchSummary::from_runs(&runs)?.print();
            Ok(())
        }
        Commands::Section { file } => {
            let doc = source::load(&file)?;
            let section = pipeline.section(&doc)?;
            for line in section.texts() {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Chunks { file } => {
            let doc = source::load(&file)?;
            let chunking = pipeline.chunks(&doc)?;
            for chunk in &chunking.chunks {
                println!("── {} ──", chunk.key);
                for line in &chunk.lines {
                    println!("{line}");
                }
                println!();
            }
            println!(
                "{} accepted, {} discarded, {} resplit, {} ambiguous",
                chunking.stats.accepted, chunking.stats.discarded, chunking.stats.resplit, chunking.stats.ambiguous
            );
            Ok(())
        }
        Commands::Rules => {
            println!("{:<36} | {:<12} | {:>3} | {}", "Rule", "Checkpoint", "Pri", "Predicate");
            println!("{}", "-".repeat(90));
            for rule in pipeline.corrections().rules() {
                println!(
                    "{:<36} | {:<12} | {:>3} | {:?}",
                    rule.name,
                    rule.checkpoint.to_string(),
                    rule.priority,
                    rule.predicate
                );
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && source::is_supported(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// One pipeline run per document on the rayon pool; results keep input order.
fn process_documents(pipeline: &Pipeline, paths: &[PathBuf], workers: Option<usize>) -> Result<Vec<DocumentRun>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = workers {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("failed to build worker pool")?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let runs: Vec<DocumentRun> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let run = match source::load(path) {
                    Ok(doc) => pipeline.run(&doc),
                    Err(err) => {
                        warn!(doc = %path.display(), error = %format!("{err:#}"), "failed to load document");
                        let id = path
                            .file_name()
                            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
                        DocumentRun::failed(id, format!("{err:#}"))
                    }
                };
                pb.inc(1);
                run
            })
            .collect()
    });

    pb.finish_and_clear();
    let failed = runs.iter().filter(|r| !r.result.proceed).count();
    info!(documents = runs.len(), failed, "batch finished");
    Ok(runs)
}

fn write_records(path: &Path, runs: &[DocumentRun]) -> Result<()> {
    let records: Vec<_> = runs.iter().flat_map(|r| &r.records).collect();
    let json = serde_json::to_string_pretty(&records).context("failed to serialize records")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
