// SPDX-License-Identifier: MIT

use crate::models::MediaType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    /// Streaming-service names used to filter discovery; matched
    /// case-insensitively by substring against the catalog's provider
    /// directory.
    pub providers: Vec<String>,
    pub servers: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TMDB credential: a v4 read token (`eyJ…`) or a v3 API key.
    pub api_key: String,
    /// Two-letter watch region, e.g. "US".
    pub region: String,
    pub language: String,
    pub base_url: String,
    pub image_base: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: "US".to_string(),
            language: "en-US".to_string(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base: "https://image.tmdb.org/t/p/".to_string(),
        }
    }
}

/// Ordered embed-provider URL templates. Servers are addressed by position,
/// so the order here is the order offered to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub movie: Vec<String>,
    pub series: Vec<String>,
    pub download: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            movie: [
                "https://111movies.com/movie/",
                "https://vidlink.pro/movie/",
                "https://player.videasy.net/movie/",
                "https://vidjoy.pro/embed/movie/",
                "https://vidsrc.io/embed/movie/",
                "https://vidsrc.cc/v2/embed/movie/",
                "https://embed.su/embed/movie/",
                "https://vidrock.net/movie/",
                "https://moviesapi.club/movie/",
            ]
            .map(str::to_string)
            .to_vec(),
            series: [
                "https://111movies.com/tv/",
                "https://vidlink.pro/tv/",
                "https://player.videasy.net/tv/",
                "https://vidrock.net/tv/",
                "https://vidjoy.pro/embed/tv/",
                "https://vidsrc.io/embed/tv/",
                "https://vidsrc.cc/v2/embed/tv/",
                "https://embed.su/embed/tv/",
            ]
            .map(str::to_string)
            .to_vec(),
            download: "https://dl.vidsrc.vip".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn for_media(&self, media: MediaType) -> &[String] {
        match media {
            MediaType::Movie => &self.movie,
            MediaType::Tv => &self.series,
        }
    }
}

pub fn default_provider_names() -> Vec<String> {
    [
        "Netflix",
        "Amazon Prime",
        "Amazon Prime Video",
        "Disney",
        "Disney+",
        "HBO Max",
        "Max",
        "Hulu",
        "Apple TV+",
        "Paramount+",
        "Paramount Plus",
    ]
    .map(str::to_string)
    .to_vec()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
        Self::load(&path).unwrap_or_else(|_| {
            eprintln!("Warning: Could not load config file, using defaults");
            Self::default_with_providers()
        })
    }

    /// Default config with the provider allow-list filled in; the bare
    /// `Default` keeps it empty so a deserialized empty list stays empty.
    pub fn default_with_providers() -> Self {
        Self {
            providers: default_provider_names(),
            ..Self::default()
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn ensure_config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("flick");
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        Ok(dir)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("flick").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn has_credential(&self) -> bool {
        !self.catalog.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_standard_server_lists() {
        let config = Config::default_with_providers();
        assert!(!config.servers.movie.is_empty());
        assert!(!config.servers.series.is_empty());
        assert!(config.providers.iter().any(|p| p == "Netflix"));
        assert_eq!(config.catalog.region, "US");
        assert!(!config.has_credential());
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default_with_providers();
        config.catalog.api_key = "secret".to_string();
        config.catalog.region = "GB".to_string();

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();

        assert_eq!(parsed.catalog.api_key, "secret");
        assert_eq!(parsed.catalog.region, "GB");
        assert_eq!(parsed.servers.movie, config.servers.movie);
        assert_eq!(parsed.providers, config.providers);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let raw = r#"
            [catalog]
            api_key = "abc"
        "#;
        let parsed: Config = toml::from_str(raw).unwrap();
        assert_eq!(parsed.catalog.api_key, "abc");
        assert_eq!(parsed.catalog.language, "en-US");
        assert!(!parsed.servers.series.is_empty());
    }

    #[test]
    fn unreadable_files_fall_back_to_the_stock_config() {
        let config = Config::load_or_default("/nonexistent/flick-config.toml");
        assert!(!config.has_credential());
        assert!(config.providers.iter().any(|p| p == "Netflix"));
        assert_eq!(config.catalog.language, "en-US");
    }

    #[test]
    fn server_lists_select_by_media_type() {
        let config = Config::default_with_providers();
        assert!(config.servers.for_media(MediaType::Movie)[0].contains("/movie/"));
        assert!(config.servers.for_media(MediaType::Tv)[0].contains("/tv/"));
    }
}
