// SPDX-License-Identifier: MIT

use anyhow::Result;
use inquire::Text;
use inquire::validator::Validation;
use std::path::Path;

use crate::config::Config;

pub fn show(config: &Config) {
    let credential = if config.has_credential() {
        if config.catalog.api_key.starts_with("eyJ") {
            "set (bearer token)"
        } else {
            "set (API key)"
        }
    } else {
        "not set"
    };
    println!("Credential: {}", credential);
    println!("Region:     {}", config.catalog.region);
    println!("Language:   {}", config.catalog.language);
    println!("Providers:  {}", config.providers.join(", "));
    println!(
        "Servers:    {} movie, {} series",
        config.servers.movie.len(),
        config.servers.series.len()
    );
    println!("Config:     {}", Config::default_path().display());
}

pub fn set_key(config: &mut Config, path: &Path, key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompt_key()?,
    };
    config.catalog.api_key = key;
    config.save(path)?;
    println!("API key saved.");
    Ok(())
}

pub fn set_region(config: &mut Config, path: &Path, region: Option<String>) -> Result<()> {
    let region = match region {
        Some(region) => region,
        None => {
            Text::new("Region code (e.g. US, GB):")
                .with_validator(validate_region)
                .prompt()?
        }
    };
    let region = region.trim().to_uppercase();
    if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
        anyhow::bail!("Region must be a two-letter code, e.g. US or GB");
    }
    config.catalog.region = region;
    config.save(path)?;
    println!("Region updated to {}.", config.catalog.region);
    Ok(())
}

/// First-run prompt: without a credential no catalog call can succeed.
pub fn ensure_credential(config: &mut Config, path: &Path) -> Result<()> {
    if config.has_credential() {
        return Ok(());
    }

    println!("No TMDB credential configured.");
    println!("Get one at https://www.themoviedb.org/settings/api\n");
    config.catalog.api_key = prompt_key()?;
    config.save(path)?;
    println!("Saved to {}\n", path.display());
    Ok(())
}

fn prompt_key() -> Result<String> {
    let key = Text::new("TMDB API key or read token:")
        .with_help_message("v4 read tokens (eyJ…) are sent as a bearer header")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("A credential is required".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(key.trim().to_string())
}

fn validate_region(input: &str) -> Result<Validation, inquire::CustomUserError> {
    let trimmed = input.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid("Use a two-letter code, e.g. US".into()))
    }
}
