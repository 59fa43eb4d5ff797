// profile-scraper: command-line front end for the scraping pipeline.
//
// Configuration comes from the environment (and a `.env` file when present);
// browser work runs on the scraper worker thread.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use profile_scraper::{
    ProfileScraper, ScraperConfig, ScraperConfigBuilder, ScraperWorker, SearchQuery,
};

#[derive(Debug, Parser)]
#[command(name = "profile-scraper", version, about = "Scrape LinkedIn profiles into structured JSON")]
struct Cli {
    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Write JSON output to FILE instead of stdout
    #[arg(long, global = true, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Save normalized profile text here (read back by `extract`)
    #[arg(long, global = true, value_name = "FILE", env = "SCRAPER_TEXT_CACHE")]
    text_cache: Option<PathBuf>,

    /// Directory for diagnostic page dumps
    #[arg(long, global = true, value_name = "DIR")]
    debug_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape a single profile URL
    Scrape {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Search for people and scrape the top results
    Search {
        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        skills: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        experience: Option<String>,

        #[arg(long, value_name = "N")]
        max_profiles: Option<usize>,
    },

    /// Re-run extraction on the cached text of the last scrape
    Extract,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let worker = ScraperWorker::spawn(ProfileScraper::new(config)?)?;

    let outcome = run(&cli, &worker).await;
    worker.shutdown()?;
    outcome
}

fn build_config(cli: &Cli) -> Result<ScraperConfig> {
    let mut builder = ScraperConfigBuilder::from_env()?;
    if cli.headed {
        builder = builder.headless(false);
    }
    if let Some(path) = &cli.text_cache {
        builder = builder.text_cache_path(path);
    }
    if let Some(dir) = &cli.debug_dir {
        builder = builder.debug_dump_dir(dir);
    }
    builder.build()
}

async fn run(cli: &Cli, worker: &ScraperWorker) -> Result<()> {
    match &cli.command {
        Command::Scrape { url } => {
            let profile = worker.scrape_single(url.as_str()).await?;
            emit(&profile, cli.out.as_deref())
        }
        Command::Search {
            role,
            skills,
            location,
            experience,
            max_profiles,
        } => {
            let query = SearchQuery {
                role: role.clone(),
                skills: skills.clone(),
                location: location.clone(),
                experience: experience.clone(),
            };
            if !query.is_actionable() {
                bail!("At least one of --role or --skills is required");
            }

            let report = worker.search(query, *max_profiles).await?;
            for failure in &report.failures {
                info!("Skipped {}: {}", failure.url, failure.reason);
            }
            emit(&report.profiles, cli.out.as_deref())
        }
        Command::Extract => match worker.extract_cached().await? {
            Some(profile) => emit(&profile, cli.out.as_deref()),
            None => bail!("No cached profile text to extract from (see --text-cache)"),
        },
    }
}

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
