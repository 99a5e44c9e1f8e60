//! impress-citekey command line
//!
//! Generates and backfills cite keys for a library stored as a JSON array
//! of items.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use impress_citekey::{
    seed_defaults, validate_template, BackfillMode, BatchStatus, Backfill, CiteKeyError,
    ItemProcessor, KeyGenerator, MemoryLibrary, MemoryPreferences, PreferenceStore,
    PREF_TEMPLATE, PREF_TITLE_WORDS,
};

#[derive(Parser)]
#[command(name = "impress-citekey", version, about = "Generate citation keys from templates")]
struct Cli {
    /// JSON file of preference entries
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Template, overriding the preference file
    #[arg(long, global = true)]
    template: Option<String>,

    /// Number of title words, overriding the preference file
    #[arg(long, global = true)]
    title_words: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the key an item would get
    Preview {
        library: PathBuf,
        /// Item id (defaults to the first item)
        #[arg(long)]
        item: Option<i64>,
    },
    /// Assign keys across the library and write it back
    Backfill {
        library: PathBuf,
        /// Replace existing keys too
        #[arg(long)]
        overwrite: bool,
        /// Write the result here instead of over the input
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check a template for problems
    Validate {
        /// Template to check (defaults to the configured one)
        template: Option<String>,
    },
}

fn load_prefs(cli: &Cli) -> Result<Arc<MemoryPreferences>, CiteKeyError> {
    let prefs = match &cli.prefs {
        Some(path) => MemoryPreferences::from_json(&std::fs::read_to_string(path)?)?,
        None => MemoryPreferences::new(),
    };
    if let Some(template) = &cli.template {
        prefs.set(PREF_TEMPLATE, template.clone());
    }
    if let Some(words) = cli.title_words {
        prefs.set(PREF_TITLE_WORDS, words.to_string());
    }
    seed_defaults(&prefs);
    Ok(Arc::new(prefs))
}

fn load_library(path: &Path) -> Result<MemoryLibrary, CiteKeyError> {
    Ok(MemoryLibrary::from_json(&std::fs::read_to_string(path)?)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let prefs = load_prefs(&cli)?;
    let generator = KeyGenerator::new(prefs);

    match cli.command {
        Command::Preview { library, item } => {
            let items = load_library(&library)?.items();
            let selection: Vec<_> = match item {
                Some(id) => items.into_iter().filter(|i| i.id == id).collect(),
                None => items.into_iter().take(1).collect(),
            };
            println!("{}", impress_citekey::preview_key(&generator, Ok(selection.as_slice())));
        }
        Command::Backfill {
            library,
            overwrite,
            output,
        } => {
            let items = load_library(&library)?;
            let backfill = Backfill::new(Arc::new(items.clone()), ItemProcessor::new(generator));
            let mode = BackfillMode::from_overwrite(overwrite);

            println!("{}", BatchStatus::Running);
            let result = backfill.run_with_report(mode).await;
            let count = result.as_ref().map(|r| r.changed).map_err(|e| e.to_string());
            let status = match count {
                Ok(count) => BatchStatus::Done { count, mode },
                Err(message) => BatchStatus::Failed(message),
            };
            println!("{}", status);

            let report = result?;
            for failure in &report.failed {
                eprintln!("item {}: {}", failure.item, failure.message);
            }
            std::fs::write(output.unwrap_or(library), items.to_json()?)?;
        }
        Command::Validate { template } => {
            let template = template.unwrap_or_else(|| generator.settings().template);
            let validation = validate_template(&template);
            if validation.is_valid {
                println!("{}: ok", template);
            } else {
                println!("{}: {}", template, validation.error_message);
            }
            for warning in &validation.warnings {
                println!("  warning: {}", warning);
            }
        }
    }

    Ok(())
}
