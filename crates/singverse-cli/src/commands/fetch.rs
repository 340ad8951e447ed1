//! Fetch command implementation
//!
//! Downloads, normalizes, validates, and caches the verse source.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::process::ExitCode;

use crate::cache::CacheManager;
use crate::config::Config;
use crate::source::{default_downloader, fetch, DataOrigin};

/// Run the fetch command
///
/// # Arguments
/// * `url` - Source URL override (default: the configured source)
/// * `refresh` - Download even when data is cached
/// * `json` - Output machine-readable JSON
pub fn run(url: Option<&str>, refresh: bool, json: bool) -> Result<ExitCode> {
    let config = Config::load()?;
    let cache_mgr = CacheManager::new()?;
    let url = url.unwrap_or(&config.source_url);

    if !json {
        println!("{} {}", "Fetching:".cyan().bold(), url);
    }

    let outcome = fetch(&cache_mgr, url, refresh, default_downloader().as_ref())?;

    let origin = match &outcome.origin {
        DataOrigin::Downloaded => "downloaded",
        DataOrigin::Cache => "cache",
        DataOrigin::CacheFallback => "cache-fallback",
        DataOrigin::File(_) => "file",
    };

    if json {
        let output = json!({
            "success": true,
            "origin": origin,
            "path": cache_mgr.data_path(),
            "books": outcome.data.books.len(),
            "verses": outcome.data.verse_count(),
            "manifest": outcome.manifest,
            "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    for warning in &outcome.warnings {
        println!("  {} {}", "WARN".yellow().bold(), warning);
    }

    let status = match outcome.origin {
        DataOrigin::Downloaded => "SUCCESS".green().bold(),
        DataOrigin::CacheFallback => "OFFLINE".yellow().bold(),
        _ => "CACHED".green().bold(),
    };
    println!(
        "  {} {} books, {} verses",
        status,
        outcome.data.books.len(),
        outcome.data.verse_count()
    );
    if outcome.origin == DataOrigin::CacheFallback {
        println!("  {}", "Download failed; using the cached copy".dimmed());
    }
    println!(
        "  {}: {}",
        "Stored at".dimmed(),
        cache_mgr.data_path().display()
    );
    if let Some(manifest) = &outcome.manifest {
        println!("  {}: {}", "Hash".dimmed(), manifest.hash);
    }

    Ok(ExitCode::SUCCESS)
}
