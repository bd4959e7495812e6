use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use shorthand::files::{self, ListFileStats, LoadConfig};
use shorthand::resolver::{AbbrevList, AbbrevResolver};
use shorthand::suffixes::{CommonSuffixes, SuffixRuleStore};
use shorthand::{expand_text, Abbrev};

#[derive(Parser, Debug)]
#[command(name = "shorthand")]
#[command(about = "Abbreviation expansion tool for transcription text")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand abbreviations throughout a transcript text file
    Expand {
        /// Abbreviation list files (text or archive format, by extension)
        #[arg(long = "list", required = true)]
        lists: Vec<PathBuf>,

        /// Transcript to expand
        input: PathBuf,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an abbreviation list between the text and archive formats
    Convert {
        /// Source list; format chosen by extension
        input: PathBuf,

        /// Destination list; format chosen by extension
        output: PathBuf,
    },

    /// Check abbreviation lists for duplicate triggers and report stats
    Check {
        /// Abbreviation list files checked as one combined set
        #[arg(required = true)]
        lists: Vec<PathBuf>,

        /// Stats output file path
        #[arg(long, default_value = "check_stats.json")]
        stats_out: PathBuf,

        /// Abort on first unreadable or undecodable file
        #[arg(long)]
        fail_fast: bool,
    },

    /// Suggest suffix variants for an expansion from the rule table
    Suggest {
        /// The base expansion to suggest suffixes for
        expansion: String,

        /// Suffix rule file (JSON string list); built-in defaults when omitted
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct CheckStats {
    files: Vec<ListFileStats>,
    total_entries: usize,
    total_variants: usize,
    duplicate_tokens: Vec<String>,
    duplicate_entries: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting shorthand");
    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Expand {
            lists,
            input,
            output,
        } => expand(lists, input, output).await,
        Command::Convert { input, output } => convert(input, output).await,
        Command::Check {
            lists,
            stats_out,
            fail_fast,
        } => check(lists, stats_out, fail_fast).await,
        Command::Suggest { expansion, rules } => suggest(expansion, rules),
    }
}

async fn expand(lists: Vec<PathBuf>, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let resolver = build_resolver(&lists).await?;
    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let expanded = expand_text(&resolver, &text);
    let changed = expanded != text;
    info!("Expansion complete: {} -> {} bytes", text.len(), expanded.len());

    match output {
        Some(path) => {
            tokio::fs::write(&path, &expanded)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Expanded {} -> {}{}",
                input.display(),
                path.display(),
                if changed { "" } else { " (no changes)" }
            );
        }
        None => print!("{expanded}"),
    }
    Ok(())
}

async fn convert(input: PathBuf, output: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let entries = files::read_abbrev_file(&input).await?;
    files::write_abbrev_file(&output, &entries).await?;
    println!(
        "Converted {} entries: {} -> {}",
        entries.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

async fn check(lists: Vec<PathBuf>, stats_out: PathBuf, fail_fast: bool) -> Result<()> {
    let config = LoadConfig { fail_fast };
    let loaded = files::read_abbrev_files(&lists, &config).await?;

    let mut resolver = AbbrevResolver::new();
    for (entries, _) in &loaded {
        resolver.add_provider(AbbrevList::new(entries.clone()));
    }

    let mut duplicate_entries = 0;
    for (entries, stats) in &loaded {
        for entry in entries {
            if resolver.has_duplicate_abbreviation(entry) {
                duplicate_entries += 1;
                println!(
                    "duplicate: {:?} (in {}) collides with another entry",
                    entry.abbreviation, stats.file_path
                );
            }
        }
    }

    let stats = CheckStats {
        total_entries: loaded.iter().map(|(e, _)| e.len()).sum(),
        total_variants: loaded.iter().map(|(_, s)| s.variant_count).sum(),
        duplicate_tokens: resolver.duplicate_tokens(),
        duplicate_entries,
        files: loaded.into_iter().map(|(_, s)| s).collect(),
    };

    let json = serde_json::to_string_pretty(&stats).context("failed to serialize check stats")?;
    tokio::fs::write(&stats_out, &json)
        .await
        .with_context(|| format!("failed to write {}", stats_out.display()))?;

    println!(
        "Checked {} files: {} entries, {} colliding triggers",
        stats.files.len(),
        stats.total_entries,
        stats.duplicate_tokens.len()
    );
    println!("Stats written to {}", stats_out.display());
    Ok(())
}

fn suggest(expansion: String, rules: Option<PathBuf>) -> Result<()> {
    let suggestions = match rules {
        Some(path) => {
            let mut store = SuffixRuleStore::new(path);
            store.rules()?.suggest(&Abbrev::new("", expansion.as_str()))
        }
        None => CommonSuffixes::standard().suggest(&Abbrev::new("", expansion.as_str())),
    };

    if suggestions.is_empty() {
        println!("No suffix suggestions for {expansion:?}");
        return Ok(());
    }
    for suggestion in suggestions {
        println!("{}\t{}", suggestion.abbreviation, suggestion.expansion);
    }
    Ok(())
}

async fn build_resolver(lists: &[PathBuf]) -> Result<AbbrevResolver> {
    let loaded = files::read_abbrev_files(lists, &LoadConfig { fail_fast: true }).await?;
    let mut resolver = AbbrevResolver::new();
    for (entries, stats) in loaded {
        info!(
            "registered {}: {} entries, {} variants",
            stats.file_path, stats.entry_count, stats.variant_count
        );
        resolver.add_provider(AbbrevList::new(entries));
    }
    Ok(resolver)
}
