//! `tubesite` - targeted edits for generated YouTube channel sites.
//!
//! ## Commands
//!
//! - `catalog`: list the editable components of a page or site directory
//! - `tokens`: show the design tokens found in a page or stylesheet
//! - `parse`: turn an edit request into a structured intent
//! - `edit`: run one editing turn against a page
//! - `validate`: compare two versions of a page

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tubesite_analyzer::IntentParser;
use tubesite_common::{ChangeLogSink, EditorConfig, FileChangeLog, MemoryChangeLog};
use tubesite_core::{EditPipeline, EditValidator, ProjectFiles, TurnOutcome, WorkingSet};
use tubesite_parsers::{
    build_catalog_for_file, extract_tokens, extract_tokens_from_html, ComponentCatalogEntry,
};

#[derive(Parser)]
#[command(name = "tubesite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Targeted edits for generated YouTube channel sites", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding the editor thresholds
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the editable components of a page or a site directory
    Catalog {
        /// HTML file or site directory
        path: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the design tokens of a page or stylesheet
    Tokens {
        /// HTML or CSS file
        path: PathBuf,

        /// Extra stylesheet to read alongside an HTML file
        #[arg(long)]
        css: Option<PathBuf>,
    },

    /// Parse an edit request without applying it
    Parse {
        /// HTML file the request refers to
        html: PathBuf,

        /// The edit request, e.g. "make the subscribe button red"
        request: String,

        #[arg(long)]
        css: Option<PathBuf>,
    },

    /// Run one editing turn
    Edit {
        /// HTML file to edit
        html: PathBuf,

        /// The edit request
        request: String,

        #[arg(long)]
        css: Option<PathBuf>,

        /// Append committed edits to this change log
        #[arg(long)]
        changelog: Option<PathBuf>,

        /// Write the edited page back instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Check that an edited page is still structurally sound
    Validate {
        original: PathBuf,
        modified: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TUBESITE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|p| read(p)).transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => EditorConfig::default(),
    };
    debug!("Editor config: {:?}", config);

    match cli.command {
        Commands::Catalog { path, json } => {
            let catalog = if path.is_dir() {
                ProjectFiles::load_dir(&path)
                    .with_context(|| format!("Failed to load site from {:?}", path))?
                    .build_catalog()
            } else {
                let source_file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "index.html".to_string());
                build_catalog_for_file(&read(&path)?, &source_file)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print_catalog(&catalog);
            }
        }

        Commands::Tokens { path, css } => {
            let content = read(&path)?;
            let tokens = if path.extension().and_then(|e| e.to_str()) == Some("css") {
                extract_tokens(&content)
            } else {
                let external = read_optional(css.as_ref())?;
                extract_tokens_from_html(&content, external.as_deref())
            };
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }

        Commands::Parse { html, request, css } => {
            let working = WorkingSet::new(read(&html)?, read_optional(css.as_ref())?);
            let parser = IntentParser::new().with_config(config);
            match parser.parse(&request, &working.catalog, &working.tokens) {
                Ok(intent) => println!("{}", serde_json::to_string_pretty(&intent)?),
                Err(rejection) => {
                    println!("{} {}", "Rejected:".red().bold(), rejection.reason);
                    for suggestion in &rejection.suggestions {
                        println!("  {} {}", "-".dimmed(), suggestion);
                    }
                    bail!("request could not be parsed");
                }
            }
        }

        Commands::Edit {
            html,
            request,
            css,
            changelog,
            write,
        } => {
            let mut working = WorkingSet::new(read(&html)?, read_optional(css.as_ref())?);
            let pipeline = EditPipeline::with_config(config);

            let mut file_log;
            let mut memory_log;
            let sink: &mut dyn ChangeLogSink = match changelog {
                Some(path) => {
                    file_log = FileChangeLog::new(path);
                    &mut file_log
                }
                None => {
                    memory_log = MemoryChangeLog::new();
                    &mut memory_log
                }
            };

            let outcome = pipeline
                .run_and_commit(&mut working, &request, sink)
                .context("Failed to record the change")?;
            report_turn(&outcome);

            match outcome {
                TurnOutcome::Committed { .. } => {
                    if write {
                        fs::write(&html, &working.html)
                            .with_context(|| format!("Failed to write {:?}", html))?;
                        println!("{} {:?}", "Updated".green(), html);
                    } else {
                        println!("{}", working.html);
                    }
                }
                TurnOutcome::NeedsGeneration { prompt, .. } => println!("{}", prompt),
                _ => bail!("edit was not applied"),
            }
        }

        Commands::Validate { original, modified } => {
            let validator = EditValidator::new().with_config(config);
            match validator.check(&read(&original)?, &read(&modified)?) {
                Ok(report) => {
                    println!(
                        "{} {} -> {} elements (delta {})",
                        "Valid:".green().bold(),
                        report.original_elements,
                        report.modified_elements,
                        report.element_delta
                    );
                }
                Err(err) => {
                    println!("{} {}", "Invalid:".red().bold(), err);
                    bail!("validation failed");
                }
            }
        }
    }

    Ok(())
}

fn print_catalog(catalog: &[ComponentCatalogEntry]) {
    if catalog.is_empty() {
        println!("{}", "No components found".yellow());
        return;
    }

    println!(
        "{:<24} {:<12} {:<10} {}",
        "ID".bold(),
        "TYPE".bold(),
        "TAG".bold(),
        "SOURCE".bold()
    );
    for entry in catalog {
        println!(
            "{:<24} {:<12} {:<10} {}",
            entry.component_id.cyan(),
            entry.semantic_type.as_str(),
            entry.tag_name,
            entry.source_file.dimmed()
        );
    }
}

fn report_turn(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Committed { intent, result, .. } => {
            eprintln!(
                "{} {} on {} ({})",
                "Committed".green().bold(),
                intent.action,
                intent.target_component_id.cyan(),
                result.change_summary.as_deref().unwrap_or("No changes")
            );
        }
        TurnOutcome::NeedsGeneration { intent, .. } => {
            eprintln!(
                "{} {} on {} needs generated markup; prompt follows",
                "Pending".yellow().bold(),
                intent.action,
                intent.target_component_id.cyan()
            );
        }
        TurnOutcome::ParseFailed(rejection) => {
            eprintln!("{} {}", "Rejected:".red().bold(), rejection.reason);
            for suggestion in &rejection.suggestions {
                eprintln!("  {} {}", "-".dimmed(), suggestion);
            }
        }
        other => {
            eprintln!(
                "{} {} ({})",
                "Failed:".red().bold(),
                other.failure_reason().unwrap_or_default(),
                other.stage()
            );
        }
    }
}
