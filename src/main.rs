//! SMB Analytics CLI
//!
//! Command-line entry point:
//! - Serve the dashboard over HTTP
//! - Render panels to the terminal
//! - Check the datasets
//! - Write a default config file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use smb_analytics::api::{serve, AppState};
use smb_analytics::config::{generate_default_config, Config};
use smb_analytics::dashboard::{Dashboard, FilterState};
use smb_analytics::data::{DatasetKind, Datasets};
use smb_analytics::present::text;
use smb_analytics::{logging, Selection};

#[derive(Parser)]
#[command(name = "smb-analytics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "KPI dashboards for restaurant, construction and real-estate data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Recompute once and print
    Render {
        /// Panel to render: restaurant, construction, real-estate or all
        #[arg(default_value = "all")]
        panel: String,
        /// Restaurant location ("All" for every location)
        #[arg(short, long)]
        location: Option<String>,
        /// Construction stage, repeatable; pass "" to select none
        #[arg(short, long)]
        stage: Vec<String>,
        /// Listing stage ("All" for every stage)
        #[arg(long)]
        listing_stage: Option<String>,
        /// Reference date for job aging (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load the datasets and report row counts
    Check,

    /// Write the default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let (config, source) = load_config(cli.config.as_deref())?;
    logging::init(&config.logging);
    match source {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file found, using defaults and environment"),
    }

    match cli.command {
        Commands::Serve => run_serve(config).await,
        Commands::Render {
            panel,
            location,
            stage,
            listing_stage,
            as_of,
            format,
        } => {
            let state = FilterState {
                location: location.map(Selection::choice).unwrap_or_default(),
                stages: if stage.is_empty() {
                    Selection::All
                } else {
                    Selection::many(stage)
                },
                listing_stage: listing_stage.map(Selection::choice).unwrap_or_default(),
            };
            run_render(config, &panel, &state, as_of, format)
        }
        Commands::Check => run_check(&config),
        Commands::Config { .. } => Ok(()),
    }
}

/// Config plus the file it came from; errors here are returned before
/// logging is installed, so they surface through `main`'s `Result`
fn load_config(path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let source = path.map(Path::to_path_buf).or_else(Config::default_path);
    let config = match &source {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env().context("Invalid configuration in environment")?,
    };
    Ok((config, source))
}

fn load_dashboard(config: &Config) -> Result<Dashboard> {
    let datasets = Datasets::load(&config.data.paths()).context("Failed to load datasets")?;
    Ok(Dashboard::new(Arc::new(datasets), config.dashboard.clone()))
}

async fn run_serve(config: Config) -> Result<()> {
    tracing::info!("Starting SMB Analytics v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", config.data.data_dir);

    let dashboard = Arc::new(load_dashboard(&config)?);
    let state = AppState::new(dashboard, config.api.clone());

    serve(state).await.context("Server failed")?;
    Ok(())
}

fn run_render(
    config: Config,
    panel: &str,
    state: &FilterState,
    as_of: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    let kind = match panel {
        "all" => None,
        other => Some(
            other
                .parse::<DatasetKind>()
                .map_err(|e| anyhow::anyhow!(e))?,
        ),
    };

    let dashboard = load_dashboard(&config)?;
    warn_unknown_choices(&dashboard, state);
    let today = as_of.unwrap_or_else(|| dashboard.reference_date());

    let output = match kind {
        Some(kind) => {
            let view = dashboard.render_panel_at(kind, state, today);
            match format {
                OutputFormat::Text => text::render_panel(&view),
                OutputFormat::Json => serde_json::to_string_pretty(&view)?,
            }
        }
        None => {
            let view = dashboard.recompute_at(state, today);
            match format {
                OutputFormat::Text => text::render_dashboard(&view),
                OutputFormat::Json => serde_json::to_string_pretty(&view)?,
            }
        }
    };

    println!("{}", output);
    Ok(())
}

/// Unknown values are valid (they select nothing) but usually a typo
fn warn_unknown_choices(dashboard: &Dashboard, state: &FilterState) {
    for kind in DatasetKind::all() {
        let values: Vec<&String> = match state.selection(*kind) {
            Selection::All => Vec::new(),
            Selection::One(value) => vec![value],
            Selection::Many(values) => values.iter().collect(),
        };
        for value in values {
            if !dashboard.is_known_choice(*kind, value) {
                tracing::warn!(panel = %kind, value = %value, "Filter value matches no rows");
            }
        }
    }
}

fn run_check(config: &Config) -> Result<()> {
    let paths = config.data.paths();
    let datasets = Datasets::load(&paths).context("Dataset check failed")?;

    for kind in DatasetKind::all() {
        println!(
            "{:<14} {:>8} rows  {}",
            kind.to_string(),
            datasets.row_count(*kind),
            paths.get(*kind).display()
        );
    }
    Ok(())
}

fn write_default_config(output: Option<&Path>) -> Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
