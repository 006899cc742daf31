// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate the configuration and log what a run would use.
pub fn run_validate(config: &Config) -> Result<()> {
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!("✓ Config OK");
    log::info!("    Listing: {}", config.source.listing_url);
    log::info!("    Pages: {}", config.source.page_count);
    log::info!("    User agent: {}", config.fetcher.user_agent);
    log::info!("    Timeout: {}s", config.fetcher.timeout_secs);
    log::info!("    Columns: {:?}", config.columns);
    match config.output_dir() {
        Ok(dir) => log::info!("    Output: {}", dir.display()),
        Err(e) => {
            log::error!("Output directory unavailable: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
