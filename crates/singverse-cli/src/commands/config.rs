//! Configuration commands

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;

fn config_path() -> Result<PathBuf> {
    Config::default_path().ok_or_else(|| anyhow!("Failed to determine config directory"))
}

/// Print the effective configuration
pub fn show(json: bool) -> Result<ExitCode> {
    let path = config_path()?;
    let config = Config::load_from(&path)?;
    let rendered = serde_json::to_string_pretty(&config)?;

    if json {
        println!("{}", rendered);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Configuration".cyan().bold());
    let status = if path.exists() { "" } else { " (not created, showing defaults)" };
    println!("  {}: {}{}", "File".dimmed(), path.display(), status.dimmed());
    for line in rendered.lines() {
        println!("  {}", line);
    }
    Ok(ExitCode::SUCCESS)
}

/// Write a default config file
pub fn init(force: bool) -> Result<ExitCode> {
    let path = config_path()?;
    if path.exists() && !force {
        bail!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    println!(
        "{} Wrote {}",
        "SUCCESS".green().bold(),
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}
