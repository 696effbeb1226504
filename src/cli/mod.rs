use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

mod progress;

use lorepatch::apply_journal::ApplyJournal;
use lorepatch::contexts::{FileDocumentStore, PatchEngine};
use lorepatch::data::EditDirective;
use lorepatch::registries::{FileEngineConfigRegistry, DEFAULT_CONFIG_FILE};
use progress::ProgressIndicator;

#[derive(Clone)]
pub struct Config {
    pub verbose: bool,
    pub dry_run: bool,
    /// Directory documents are resolved against
    pub root: PathBuf,
    /// Engine config file; defaults to `lorepatch.yml` under the root
    pub config_path: Option<PathBuf>,
}

/// Reads model output from a file, or from stdin when `input` is absent or `-`
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}

fn load_engine(config: &Config) -> Result<PatchEngine<FileDocumentStore>> {
    let config_path = config
        .config_path
        .clone()
        .unwrap_or_else(|| config.root.join(DEFAULT_CONFIG_FILE));
    let engine_config = FileEngineConfigRegistry::new(Some(config_path.clone()))
        .load()
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if config.verbose {
        println!(
            "Breadcrumbs: {}, narrative files: {}",
            engine_config.breadcrumbs,
            engine_config.narrative_files.join(", ")
        );
    }

    let store = FileDocumentStore::new(Some(config.root.clone()));
    Ok(PatchEngine::new(store, engine_config).with_dry_run(config.dry_run))
}

fn parse_input(input: Option<&Path>, engine: &PatchEngine<FileDocumentStore>) -> Result<Vec<EditDirective>> {
    let raw = read_input(input)?;
    Ok(engine.parse(&raw))
}

pub async fn parse(input: Option<PathBuf>, config: &Config) -> Result<()> {
    let engine = load_engine(config)?;
    let directives = parse_input(input.as_deref(), &engine)?;

    let json = serde_json::to_string_pretty(&directives).context("Failed to serialize directives")?;
    println!("{}", json);
    Ok(())
}

pub async fn validate(input: Option<PathBuf>, config: &Config) -> Result<()> {
    let engine = load_engine(config)?;
    let directives = parse_input(input.as_deref(), &engine)?;

    if directives.is_empty() {
        println!("No directives found");
        return Ok(());
    }

    let mut failed = 0;
    let mut duplicates = 0;
    for directive in &directives {
        let outcome = engine.validate(directive).await;
        println!("{}\n", outcome.preview(directive));
        if !outcome.matched {
            failed += 1;
        }
        if outcome.already_exists {
            duplicates += 1;
        }
        if config.verbose {
            println!("{}", serde_json::to_string(&outcome)?);
        }
    }

    println!(
        "{} directive(s): {} would apply, {} would be skipped, {} probable duplicate(s)",
        directives.len(),
        directives.len() - failed,
        failed,
        duplicates
    );

    if failed > 0 {
        anyhow::bail!("{} directive(s) would not apply", failed);
    }
    Ok(())
}

pub async fn apply(input: Option<PathBuf>, config: &Config) -> Result<()> {
    let engine = load_engine(config)?;
    let directives = parse_input(input.as_deref(), &engine)?;

    if directives.is_empty() {
        println!("No directives found");
        return Ok(());
    }

    let mut journal = ApplyJournal::load(&config.root)?;
    let touched: HashSet<&str> = directives.iter().map(|d| d.file_path.as_str()).collect();
    for file_path in journal.externally_modified(&config.root)? {
        if touched.contains(file_path.as_str()) {
            println!("⚠ {} changed since the last apply", file_path);
        }
    }

    let report = engine.apply_all(&directives).await;

    let mut progress = ProgressIndicator::new(report.files.len());
    for file in &report.files {
        progress.complete_item(file);
    }
    progress.finish();

    if config.dry_run {
        println!("Dry run: no files written");
        return Ok(());
    }

    if journal.record_batch(&report) > 0 {
        journal.save(&config.root)?;
    }
    Ok(())
}

pub async fn journal(config: &Config) -> Result<()> {
    let journal = ApplyJournal::load(&config.root)?;
    println!("{}", journal.summary());

    let modified = journal.externally_modified(&config.root)?;
    if !modified.is_empty() {
        println!("\nChanged outside lorepatch since the last apply:");
        for file_path in modified {
            println!("  {}", file_path);
        }
    }
    Ok(())
}
