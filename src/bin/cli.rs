//! share-scraper CLI
//!
//! Scrapes the S&P 500 components listing into `~/Documents/Share_Data/<date>.csv`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use share_scraper::{
    error::Result,
    models::Config,
    pipeline::{self, RunOutcome, Scraper},
    storage::CsvStore,
    utils::http::HttpFetcher,
};

/// share-scraper - S&P 500 share price scraper
#[derive(Parser, Debug)]
#[command(name = "share-scraper", version, about = "Scrapes share prices into a dated CSV file")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "share-scraper.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the listing pages into today's CSV file
    Run {
        /// Output directory (default: ~/Documents/Share_Data)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate the configuration
    Validate,

    /// Show the output directory and the files already written
    Info,

    /// Print the effective configuration as TOML
    Config,
}

/// Initialize logging at the given level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = if cli.verbose {
        "debug"
    } else {
        loaded
            .as_ref()
            .map(|c| c.logging.level.as_str())
            .unwrap_or("info")
    };
    init_logging(level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    match cli.command {
        Command::Run { output_dir } => {
            if let Some(dir) = output_dir {
                config.output.dir = Some(dir);
            }

            let store = CsvStore::from_config(&config)?;
            let fetcher = HttpFetcher::from_config(&config.fetcher)?;
            let scraper = Scraper::new(&config, fetcher, store)?;

            match scraper.run()? {
                RunOutcome::AlreadyExists { path } => {
                    log::info!("Nothing to do: {} already exists", path.display());
                }
                RunOutcome::Written {
                    path,
                    records,
                    stats,
                } => {
                    log::info!("Wrote {} shares to {}", records, path.display());
                    log::info!(
                        "    Pages: {} read, {} missing of {}",
                        stats.pages_visited,
                        stats.pages_missing,
                        stats.pages_requested
                    );
                    log::info!(
                        "    Rows: {} seen, {} blank, {} malformed",
                        stats.rows_seen,
                        stats.rows_blank,
                        stats.rows_malformed
                    );
                    log::info!("    Took {:.1}s", stats.elapsed_secs());
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            let store = CsvStore::from_config(&config)?;
            log::info!("Output directory: {}", store.dir().display());

            let files = store.list()?;
            if files.is_empty() {
                log::info!("No share files written yet.");
            }
            for file in files {
                log::info!("    {}", file.display());
            }
        }

        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
