// SPDX-License-Identifier: MIT

use crate::cache::RequestCache;
use crate::config::CatalogConfig;
use crate::models::{
    Genre, GenreList, MediaType, Page, ProviderDirectory, Title, TitleDetails,
};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Total attempts per cache miss, including the first.
const MAX_ATTEMPTS: u32 = 2;
/// Base backoff; attempt N waits N times this before the next try.
const BACKOFF_STEP: Duration = Duration::from_millis(400);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("catalog API returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Catalog credential, classified by shape. TMDB v4 read tokens are JWTs
/// (they start with `eyJ`) and travel as a bearer header; anything else is
/// treated as a v3 key and sent as the `api_key` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with("eyJ") {
            Self::Bearer(raw)
        } else {
            Self::ApiKey(raw)
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomePage {
    pub trending: Page<Title>,
    pub movies: Page<Title>,
    pub tv: Page<Title>,
}

/// Client for the TMDB catalog API with a session request cache.
///
/// Identical requests hit the network once per session: responses are stored
/// under a canonical signature (path plus sorted query parameters) and the
/// cache never expires. Each cache miss gets up to two attempts with a
/// 400ms-per-attempt backoff in between.
#[derive(Debug)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    credential: Credential,
    language: String,
    region: String,
    cache: RequestCache,
}

impl TmdbClient {
    pub fn new(catalog: &CatalogConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("Mozilla/5.0")
                .build()?,
            base_url: catalog.base_url.trim_end_matches('/').to_string(),
            credential: Credential::classify(catalog.api_key.clone()),
            language: catalog.language.clone(),
            region: catalog.region.clone(),
            cache: RequestCache::new(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Swaps the credential for subsequent requests. Cached entries are kept:
    /// key-shaped credentials are part of the signature (a new key misses the
    /// cache), but bearer-shaped ones are not, so results fetched under an
    /// old bearer token keep being served.
    pub fn set_credential(&mut self, raw: impl Into<String>) {
        self.credential = Credential::classify(raw);
    }

    /// Resolves the request target and its canonical signature. Parameters
    /// are sorted by key, so two logically identical requests share a
    /// signature regardless of insertion order; the caller can override the
    /// default `language`.
    pub(crate) fn build_url(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(Url, String), ApiError> {
        let mut merged: BTreeMap<&str, String> = BTreeMap::new();
        merged.insert("language", self.language.clone());
        for (key, value) in params {
            merged.insert(key, value.clone());
        }
        if let Credential::ApiKey(key) = &self.credential {
            merged.insert("api_key", key.clone());
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        url.query_pairs_mut().extend_pairs(merged.iter());
        let signature = url.as_str().to_string();
        Ok((url, signature))
    }

    /// Fetches a raw JSON payload, serving repeats from the session cache.
    /// Concurrent calls for the same signature share one network request.
    pub async fn request(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let (url, signature) = self.build_url(path, params)?;
        let cell = self.cache.cell(&signature);
        cell.get_or_try_init(|| self.fetch(&url)).await.cloned()
    }

    async fn fetch(&self, url: &Url) -> Result<Value, ApiError> {
        let mut attempt = 1;
        loop {
            match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!("catalog request failed (attempt {}): {}", attempt, e);
                    tokio::time::sleep(BACKOFF_STEP * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("catalog request failed (attempt {}), giving up: {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, url: &Url) -> Result<Value, ApiError> {
        debug!("GET {}", url.path());

        let mut req = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Credential::Bearer(token) = &self.credential {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Bodies can be arbitrary HTML; cut on a char boundary.
            let message = body.chars().take(200).collect();
            return Err(ApiError::Status { status, message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn genre_list(&self, media: MediaType) -> Result<Vec<Genre>, ApiError> {
        let value = self
            .request(&format!("/genre/{}/list", media.as_path()), &[])
            .await?;
        let list: GenreList = serde_json::from_value(value)?;
        Ok(list.genres)
    }

    pub async fn trending(&self, page: u32) -> Result<Page<Title>, ApiError> {
        let value = self
            .request("/trending/all/week", &[("page", page.to_string())])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Popularity-sorted discovery, restricted to the resolved streaming
    /// providers when the ID set is non-empty.
    pub async fn discover(
        &self,
        media: MediaType,
        page: u32,
        provider_ids: &[u64],
        extra: &[(&str, String)],
    ) -> Result<Page<Title>, ApiError> {
        let mut params: Vec<(&str, String)> = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
            ("include_adult", "false".to_string()),
            ("watch_region", self.region.clone()),
        ];
        if !provider_ids.is_empty() {
            let joined = provider_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("|");
            params.push(("with_watch_providers", joined));
        }
        params.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        let value = self
            .request(&format!("/discover/{}", media.as_path()), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Aggregate detail payload: credits, similar titles, and watch
    /// providers come back in one call.
    pub async fn details(&self, media: MediaType, id: u64) -> Result<TitleDetails, ApiError> {
        let value = self
            .request(
                &format!("/{}/{}", media.as_path(), id),
                &[(
                    "append_to_response",
                    "videos,credits,similar,watch/providers".to_string(),
                )],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn search_multi(&self, query: &str, page: u32) -> Result<Page<Title>, ApiError> {
        let value = self
            .request(
                "/search/multi",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Directory of watch providers available in the configured region.
    pub async fn provider_directory(
        &self,
        media: MediaType,
    ) -> Result<ProviderDirectory, ApiError> {
        let value = self
            .request(
                &format!("/watch/providers/{}", media.as_path()),
                &[("watch_region", self.region.clone())],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Front-page fan-out: trending plus movie and TV discovery, fetched
    /// concurrently. Any single failure fails the whole page.
    pub async fn home(&self, page: u32, provider_ids: &[u64]) -> Result<HomePage, ApiError> {
        let (trending, movies, tv) = tokio::try_join!(
            self.trending(page),
            self.discover(MediaType::Movie, page, provider_ids, &[]),
            self.discover(MediaType::Tv, page, provider_ids, &[]),
        )?;
        Ok(HomePage {
            trending,
            movies,
            tv,
        })
    }
}
