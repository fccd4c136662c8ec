// SPDX-License-Identifier: MIT

use crate::models::{MediaType, Season};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("server {index} is out of range ({count} servers configured)")]
    ServerOutOfRange { index: usize, count: usize },
    #[error("season {0} has not aired or has no episodes")]
    UnknownSeason(u32),
    #[error("episode {episode} is out of range for season {season} ({count} episodes)")]
    EpisodeOutOfRange { season: u32, episode: u32, count: u32 },
}

/// Seasons that can actually be watched: aired (parseable air date not in
/// the future) and non-empty, sorted ascending by season number.
pub fn available_seasons(seasons: &[Season], now: DateTime<Utc>) -> Vec<Season> {
    let today = now.date_naive();
    let mut available: Vec<Season> = seasons
        .iter()
        .filter(|s| {
            s.episode_count > 0
                && s.air_date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .is_some_and(|aired| aired <= today)
        })
        .cloned()
        .collect();
    available.sort_by_key(|s| s.season_number);
    available
}

/// What the user is currently watching: one title, one server, and for
/// series a season/episode pair kept consistent with the title's aired
/// seasons. The embed URL is derived, never stored; servers are addressed
/// by position in the configured template list, so every selection change
/// recomputes it.
#[derive(Debug, Clone)]
pub struct PlaybackSelection {
    pub title_id: u64,
    pub media_type: MediaType,
    pub server_index: usize,
    pub season: u32,
    pub episode: u32,
    available: Vec<Season>,
}

impl PlaybackSelection {
    /// Opens a title for playback. The server index resets to 0 on every
    /// new title; season defaults to the first available one (1 for movies
    /// and for series with nothing aired yet), episode to 1.
    pub fn open(title_id: u64, media_type: MediaType, seasons: &[Season]) -> Self {
        Self::open_at(title_id, media_type, seasons, Utc::now())
    }

    pub fn open_at(
        title_id: u64,
        media_type: MediaType,
        seasons: &[Season],
        now: DateTime<Utc>,
    ) -> Self {
        let available = available_seasons(seasons, now);
        let season = available.first().map(|s| s.season_number).unwrap_or(1);
        Self {
            title_id,
            media_type,
            server_index: 0,
            season,
            episode: 1,
            available,
        }
    }

    pub fn available_seasons(&self) -> &[Season] {
        &self.available
    }

    fn current_season(&self) -> Option<&Season> {
        self.available
            .iter()
            .find(|s| s.season_number == self.season)
    }

    pub fn set_server(&mut self, index: usize, server_count: usize) -> Result<(), SelectionError> {
        if index >= server_count {
            return Err(SelectionError::ServerOutOfRange {
                index,
                count: server_count,
            });
        }
        self.server_index = index;
        Ok(())
    }

    /// Selecting a season always resets the episode to 1.
    pub fn set_season(&mut self, season: u32) -> Result<(), SelectionError> {
        if !self.available.iter().any(|s| s.season_number == season) {
            return Err(SelectionError::UnknownSeason(season));
        }
        self.season = season;
        self.episode = 1;
        Ok(())
    }

    pub fn set_episode(&mut self, episode: u32) -> Result<(), SelectionError> {
        let count = self
            .current_season()
            .map(|s| s.episode_count)
            .ok_or(SelectionError::UnknownSeason(self.season))?;
        if episode == 0 || episode > count {
            return Err(SelectionError::EpisodeOutOfRange {
                season: self.season,
                episode,
                count,
            });
        }
        self.episode = episode;
        Ok(())
    }

    /// "Watch season N" shortcut; identical to selecting the season.
    pub fn watch_season(&mut self, season: u32) -> Result<(), SelectionError> {
        self.set_season(season)
    }

    /// Derives the embed URL from the ordered template list. Pure; for TV
    /// the season/episode pair is appended to the title id.
    pub fn embed_url(&self, templates: &[String]) -> Result<String, SelectionError> {
        let template =
            templates
                .get(self.server_index)
                .ok_or(SelectionError::ServerOutOfRange {
                    index: self.server_index,
                    count: templates.len(),
                })?;
        let mut url = format!("{}{}", template, self.title_id);
        if self.media_type == MediaType::Tv {
            url.push_str(&format!("/{}/{}", self.season, self.episode));
        }
        Ok(url)
    }

    /// Direct-download link for the current selection.
    pub fn download_url(&self, host: &str) -> String {
        match self.media_type {
            MediaType::Movie => format!("{}/movie/{}", host, self.title_id),
            MediaType::Tv => format!(
                "{}/tv/{}/{}/{}",
                host, self.title_id, self.season, self.episode
            ),
        }
    }
}
