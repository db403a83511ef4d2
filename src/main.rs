mod commands;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filter_calendar_core::config::{AppConfig, FilterConfig};
use filter_calendar_core::date_range::DateRange;
use filter_calendar_core::source::{EventSource, JsonFileSource, LocalCalendarSource};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filter-calendar")]
#[command(about = "Show a filtered, merged view of your tracked calendars")]
struct Cli {
    /// Config file (defaults to ~/.config/filter-calendar/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List merged events
    Events {
        /// Only show this filtered calendar (by name)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD, or "end" for all future events)
        #[arg(long)]
        to: Option<String>,

        /// Read raw events from a JSON file instead of the calendar directory
        #[arg(long)]
        source_json: Option<PathBuf>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Show the current or next merged event
    Next {
        /// Only show this filtered calendar (by name)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Read raw events from a JSON file instead of the calendar directory
        #[arg(long)]
        source_json: Option<PathBuf>,

        /// Print JSON instead of a summary line
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration, including filter patterns
    Check,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Events {
            calendar,
            from,
            to,
            source_json,
            json,
        } => {
            let configs = resolve_calendars(&cfg, calendar.as_deref())?;
            let range = DateRange::from_args(from.as_deref(), to.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            let source = build_source(&cfg, source_json);
            commands::events::run(configs, source.as_ref(), range, json)
        }
        Commands::Next {
            calendar,
            source_json,
            json,
        } => {
            let configs = resolve_calendars(&cfg, calendar.as_deref())?;
            let source = build_source(&cfg, source_json);
            commands::next::run(configs, source.as_ref(), json)
        }
        Commands::Check => commands::check::run(&cfg),
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::config_path()?,
    };

    AppConfig::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn resolve_calendars(cfg: &AppConfig, name: Option<&str>) -> Result<Vec<FilterConfig>> {
    if cfg.calendars.is_empty() {
        anyhow::bail!(
            "No calendars configured.\n\n\
            Add one to your config.toml:\n\n  \
            [[calendars]]\n  \
            name = \"Work\"\n  \
            tracking_calendar_id = \"roster\"\n  \
            filter = \"Shift\""
        );
    }

    match name {
        Some(name) => match cfg.calendar(name) {
            Some(c) => Ok(vec![c.clone()]),
            None => {
                let available: Vec<_> = cfg.calendars.iter().map(|c| c.name.as_str()).collect();
                anyhow::bail!(
                    "Calendar '{}' not found. Available: {}",
                    name,
                    available.join(", ")
                );
            }
        },
        None => Ok(cfg.calendars.clone()),
    }
}

fn build_source(cfg: &AppConfig, source_json: Option<PathBuf>) -> Box<dyn EventSource> {
    match source_json {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(LocalCalendarSource::new(cfg.data_path())),
    }
}
