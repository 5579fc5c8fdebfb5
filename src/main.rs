use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use doc_locator::config::{self, LookupConfig};
use doc_locator::ts::lang;
use doc_locator::{DocLookup, Document, DocumentationProvider};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "doc-locator")]
#[command(about = "Find documentation comments and the declarations they document", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./doc-locator.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the doc comment at a byte offset of a file
    Lookup {
        /// Source file to inspect
        file: PathBuf,

        /// Byte offset of the cursor
        #[arg(short, long)]
        offset: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every doc comment and its owner under a directory
    Scan {
        /// Directory (or single file) to scan
        path: PathBuf,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported languages and their file extensions
    Languages,
}

#[derive(Serialize)]
struct FileReport {
    file: PathBuf,
    docs: Vec<DocLookup>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = env::current_dir()?;
    let config = config::discover(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Lookup { file, offset, json } => cmd_lookup(&config, &file, offset, json),
        Commands::Scan { path, json } => cmd_scan(&config, &path, json),
        Commands::Languages => cmd_languages(),
    }
}

fn provider_for(config: &LookupConfig, document: &Document) -> Result<DocumentationProvider> {
    DocumentationProvider::from_config(document.language(), config).with_context(|| {
        format!(
            "documentation lookup is disabled for {}",
            lang::name(document.language())
        )
    })
}

fn cmd_lookup(config: &LookupConfig, file: &Path, offset: usize, json: bool) -> Result<()> {
    let document = Document::open(file)?;
    if offset > document.source().len() {
        anyhow::bail!(
            "offset {} is past the end of {} ({} bytes)",
            offset,
            file.display(),
            document.source().len()
        );
    }
    warn_on_errors(&document, file);

    let provider = provider_for(config, &document)?;
    let found = provider.lookup(document.tree(), offset);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    match found {
        Some(found) => print_lookup(&found),
        None => println!("{}", format!("No documentation comment at offset {offset}").yellow()),
    }
    Ok(())
}

fn cmd_scan(config: &LookupConfig, path: &Path, json: bool) -> Result<()> {
    let mut reports = Vec::new();

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(language) = lang::for_path(entry.path()) else {
            continue;
        };
        let Some(provider) = DocumentationProvider::from_config(language, config) else {
            continue;
        };

        let document = match Document::open(entry.path()) {
            Ok(document) => document,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Warning: skipping {}: {}", entry.path().display(), e).yellow()
                );
                continue;
            }
        };
        warn_on_errors(&document, entry.path());
        let docs = provider.doc_comments(document.tree());
        provider.cache().forget(document.tree().lineage());

        if !docs.is_empty() {
            reports.push(FileReport {
                file: entry.path().to_path_buf(),
                docs,
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("{}", "No documentation comments found".yellow());
        return Ok(());
    }

    let mut total = 0;
    for report in &reports {
        println!("{}", report.file.display().to_string().bold());
        for found in &report.docs {
            println!(
                "  {} {} {}",
                format!("{}..{}", found.comment.byte_start, found.comment.byte_end).dimmed(),
                "→".dimmed(),
                describe_owner(found)
            );
        }
        total += report.docs.len();
    }
    println!();
    println!(
        "{}",
        format!("{} doc comment(s) in {} file(s)", total, reports.len()).green()
    );
    Ok(())
}

fn cmd_languages() -> Result<()> {
    for language in lang::SUPPORTED {
        let extensions: Vec<String> = lang::extensions(*language)
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!("{:<12} {}", lang::name(*language).bold(), extensions.join(" "));
    }
    Ok(())
}

fn print_lookup(found: &DocLookup) {
    println!(
        "{} {}",
        "Comment".green().bold(),
        format!("[{}..{}]", found.comment.byte_start, found.comment.byte_end).dimmed()
    );
    for line in found.comment.text.lines() {
        println!("  {line}");
    }
    println!(
        "{} {}",
        "Owner".green().bold(),
        format!("[{}..{}]", found.owner.byte_start, found.owner.byte_end).dimmed()
    );
    println!("  {}", describe_owner(found));
}

/// `kind: first line of the owner`
fn describe_owner(found: &DocLookup) -> String {
    let first_line = found.owner.text.lines().next().unwrap_or("").trim();
    format!("{}: {}", found.owner.kind.cyan(), first_line)
}

fn warn_on_errors(document: &Document, file: &Path) {
    if document.has_errors() {
        eprintln!(
            "{}",
            format!(
                "Warning: {} has {} syntax error(s); results may be incomplete",
                file.display(),
                document.error_nodes().len()
            )
            .yellow()
        );
    }
}
