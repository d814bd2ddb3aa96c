//! Second Brain CLI
//!
//! `generate` builds the static memory index; `browse` searches it.

use clap::{Args, Parser, Subcommand};
use second_brain::config::{self, ConfigFile, ConfigOverrides};
use second_brain::dashboard::{load, DashboardState};
use second_brain::tui::widgets::{source_line, EMPTY_TEXT};
use second_brain::tui::App;
use second_brain::{BrainConfig, CategoryFilter, DataSource, Pipeline};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Second Brain - searchable static index of notes, transcripts and logs
#[derive(Parser, Debug)]
#[command(name = "second-brain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the input directories and write the JSON artifacts
    Generate {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Search the generated artifacts
    Browse {
        #[command(flatten)]
        paths: PathArgs,

        /// Directory or http(s) URL holding manifest.json and search-index.json
        #[arg(long, conflicts_with = "site")]
        data: Option<String>,

        /// Deployment base (directory or URL); artifacts are read from its data/
        #[arg(long)]
        site: Option<String>,

        /// Initial search query
        #[arg(short, long, default_value = "")]
        query: String,

        /// Initial category filter (all, daily-notes, brain-dumps, ...)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Disable TUI and print results as plain text
        #[arg(long)]
        no_tui: bool,
    },
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Workspace root that source paths are relative to
    #[arg(short = 'w', long)]
    workspace: Option<PathBuf>,

    /// Daily notes and brain dumps directory
    #[arg(long)]
    notes_dir: Option<PathBuf>,

    /// Transcripts directory
    #[arg(long)]
    transcripts_dir: Option<PathBuf>,

    /// Logs directory
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Extraction results directory
    #[arg(long)]
    extraction_dir: Option<PathBuf>,

    /// Output directory for the JSON artifacts
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl PathArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            workspace_root: self.workspace.clone(),
            notes_dir: self.notes_dir.clone(),
            transcripts_dir: self.transcripts_dir.clone(),
            logs_dir: self.logs_dir.clone(),
            extraction_dir: self.extraction_dir.clone(),
            out_dir: self.out_dir.clone(),
        }
    }

    async fn resolve(&self, cwd: &Path) -> anyhow::Result<BrainConfig> {
        let file = ConfigFile::discover(cwd).await?;
        Ok(config::resolve(cwd, self.overrides(), file, |key| {
            std::env::var(key).ok()
        }))
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Generate { paths } => {
            init_logging(paths.verbose);
            let config = paths.resolve(&cwd).await?;
            run_generate(config).await
        }
        Command::Browse {
            paths,
            data,
            site,
            query,
            category,
            no_tui,
        } => {
            let config = paths.resolve(&cwd).await?;
            let source = match (data, site) {
                (Some(data), _) => DataSource::parse(&data)?,
                (None, Some(site)) => DataSource::for_site(&site)?,
                (None, None) => DataSource::directory(&config.out_dir),
            };

            if no_tui {
                init_logging(paths.verbose);
                run_plain_mode(source, &query, category).await
            } else {
                // No log subscriber: the dashboard owns the terminal
                run_tui_mode(source, &query, category).await
            }
        }
    }
}

async fn run_generate(config: BrainConfig) -> anyhow::Result<()> {
    info!("Workspace root: {:?}", config.workspace_root);
    let pipeline = Pipeline::new(config);
    let summary = pipeline.run().await?;

    println!(
        "Generated {} searchable memory documents in {}",
        summary.total,
        summary.out_dir.display()
    );
    Ok(())
}

async fn run_tui_mode(source: DataSource, query: &str, category: CategoryFilter) -> anyhow::Result<()> {
    let mut app = App::new(query, category)?;
    app.run(source).await?;
    Ok(())
}

async fn run_plain_mode(source: DataSource, query: &str, category: CategoryFilter) -> anyhow::Result<()> {
    info!("Loading {}", source.locate(second_brain::memory::MANIFEST_FILE));

    let mut state = DashboardState::new();
    state.set_query(query);
    state.set_filter(category);

    let result = load(&source).await;
    if let Err(e) = &result {
        warn!("Could not load memory index: {}", e);
    }
    state.apply_loaded(result);

    if let Some(manifest) = &state.manifest {
        println!(
            "Second Brain: {} documents, generated {} (viewport {})",
            state.total_documents(),
            manifest.generated_at,
            state.viewport_target()
        );
    }
    let chips: Vec<String> = state
        .chip_counts()
        .into_iter()
        .map(|(filter, count)| {
            let marker = if filter == state.filter() { "*" } else { "" };
            format!("{}{} ({})", marker, filter.label(), count)
        })
        .collect();
    println!("{}\n", chips.join("  "));

    let results = state.results();
    if results.is_empty() {
        println!("{}", EMPTY_TEXT);
        return Ok(());
    }

    for doc in results {
        println!("[{}] {}", doc.category.label(), doc.title);
        println!("  {}", source_line(doc));
        println!("  {}\n", second_brain::dashboard::snippet(doc, state.query()));
    }
    Ok(())
}
