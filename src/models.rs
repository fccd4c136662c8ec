// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// TMDB refuses list pages beyond 500 regardless of `total_pages`.
pub const MAX_LISTED_PAGES: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "series" | "show" => Ok(Self::Tv),
            _ => anyhow::bail!("Invalid media type: {}. Use 'movie' or 'tv'", s),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

/// One page of a TMDB list endpoint (`results` array plus paging counters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn listed_pages(&self) -> u32 {
        self.total_pages.clamp(1, MAX_LISTED_PAGES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// A movie, series, or person as returned by list/search endpoints. Movie and
/// TV payloads disagree on field names (title vs name, release_date vs
/// first_air_date), so everything is optional and resolved through helpers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Title {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl Title {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .or(self.original_title.as_deref())
            .or(self.original_name.as_deref())
            .unwrap_or("Untitled")
    }

    /// Multi-search mixes in people; they are filtered out before rendering.
    pub fn is_person(&self) -> bool {
        self.media_type.as_deref() == Some("person")
    }

    /// Explicit media_type when present, otherwise inferred from which
    /// title field the payload used.
    pub fn kind(&self) -> MediaType {
        match self.media_type.as_deref() {
            Some("tv") => MediaType::Tv,
            Some("movie") => MediaType::Movie,
            _ => {
                if self.title.is_some() {
                    MediaType::Movie
                } else {
                    MediaType::Tv
                }
            }
        }
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.get(..4))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Season {
    pub fn label(&self) -> String {
        if self.season_number == 0 {
            "Specials".to_string()
        } else {
            format!("Season {}", self.season_number)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDirectory {
    #[serde(default)]
    pub results: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchProviderResults {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

/// Aggregate detail payload requested with
/// `append_to_response=videos,credits,similar,watch/providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub similar: Option<Page<Title>>,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: Option<WatchProviderResults>,
}

impl TitleDetails {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .or(self.original_title.as_deref())
            .or(self.original_name.as_deref())
            .unwrap_or("Untitled")
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.get(..4))
    }

    /// Flatrate providers for a region, if the aggregate payload carried any.
    pub fn flatrate_providers(&self, region: &str) -> &[WatchProvider] {
        self.watch_providers
            .as_ref()
            .and_then(|wp| wp.results.get(region))
            .map(|r| r.flatrate.as_slice())
            .unwrap_or(&[])
    }
}

/// Poster/backdrop path to a full image URL, e.g. size "w342".
pub fn image_url(image_base: &str, size: &str, path: &str) -> String {
    format!("{}{}{}", image_base, size, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_falls_back_through_variants() {
        let mut title = Title {
            id: 1,
            media_type: None,
            title: None,
            name: Some("The Wire".to_string()),
            original_title: None,
            original_name: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            first_air_date: None,
            vote_average: None,
            genre_ids: vec![],
        };
        assert_eq!(title.display_title(), "The Wire");
        assert_eq!(title.kind(), MediaType::Tv);

        title.name = None;
        assert_eq!(title.display_title(), "Untitled");

        title.title = Some("Heat".to_string());
        assert_eq!(title.display_title(), "Heat");
        assert_eq!(title.kind(), MediaType::Movie);
    }

    #[test]
    fn title_pages_deserialize_from_list_payloads() {
        let raw = serde_json::json!({
            "page": 2,
            "results": [
                {"id": 603, "title": "The Matrix", "release_date": "1999-03-30"},
                {"id": 1399, "name": "Game of Thrones"}
            ],
            "total_pages": 12,
            "total_results": 230
        });
        let page: Page<Title> = serde_json::from_value(raw).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].year(), Some("1999"));
        assert_eq!(page.results[1].display_title(), "Game of Thrones");
    }

    #[test]
    fn year_tolerates_short_and_multibyte_dates() {
        let title = Title {
            release_date: Some("20".to_string()),
            ..Title::default()
        };
        assert_eq!(title.year(), None);

        let title = Title {
            first_air_date: Some("２０２４-01-01".to_string()),
            ..Title::default()
        };
        assert_eq!(title.year(), None);

        let title = Title {
            release_date: Some("2024-01-01".to_string()),
            ..Title::default()
        };
        assert_eq!(title.year(), Some("2024"));
    }

    #[test]
    fn listed_pages_is_capped() {
        let page: Page<Title> = Page {
            page: 1,
            results: vec![],
            total_pages: 3210,
            total_results: 64200,
        };
        assert_eq!(page.listed_pages(), MAX_LISTED_PAGES);

        let empty: Page<Title> = Page {
            page: 1,
            results: vec![],
            total_pages: 0,
            total_results: 0,
        };
        assert_eq!(empty.listed_pages(), 1);
    }

    #[test]
    fn details_parse_with_appended_sub_objects() {
        let raw = serde_json::json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "number_of_seasons": 8,
            "genres": [{"id": 18, "name": "Drama"}],
            "seasons": [
                {"season_number": 1, "episode_count": 10, "air_date": "2011-04-17"}
            ],
            "credits": {"cast": [{"name": "Peter Dinklage", "character": "Tyrion"}]},
            "similar": {"page": 1, "results": [], "total_pages": 0, "total_results": 0},
            "watch/providers": {
                "results": {
                    "US": {"flatrate": [{"provider_id": 1899, "provider_name": "Max"}]}
                }
            }
        });
        let details: TitleDetails = serde_json::from_value(raw).unwrap();
        assert_eq!(details.display_title(), "Game of Thrones");
        assert_eq!(details.year(), Some("2011"));
        assert_eq!(details.seasons.len(), 1);
        assert_eq!(details.flatrate_providers("US")[0].provider_name, "Max");
        assert!(details.flatrate_providers("GB").is_empty());
    }
}
