// SPDX-License-Identifier: MIT

use crate::models::MediaType;
use crate::tmdb::TmdbClient;
use std::collections::BTreeSet;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Maps the configured streaming-service allow-list to catalog provider IDs.
///
/// The movie and TV provider directories are fetched concurrently, merged,
/// and matched case-insensitively by name substring. The result is memoized
/// for the session; any directory failure degrades to an empty set so
/// discovery simply runs unfiltered.
#[derive(Debug)]
pub struct ProviderResolver {
    allow_list: Vec<String>,
    resolved: OnceCell<Vec<u64>>,
}

impl ProviderResolver {
    pub fn new(allow_list: Vec<String>) -> Self {
        Self {
            allow_list,
            resolved: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, client: &TmdbClient) -> &[u64] {
        self.resolved
            .get_or_init(|| async {
                let (movies, tv) = tokio::join!(
                    client.provider_directory(MediaType::Movie),
                    client.provider_directory(MediaType::Tv),
                );
                match (movies, tv) {
                    (Ok(movies), Ok(tv)) => {
                        let ids = self.match_ids(
                            movies.results.iter().chain(tv.results.iter()),
                        );
                        debug!("resolved {} provider ids from allow-list", ids.len());
                        ids
                    }
                    (movies, tv) => {
                        for err in [movies.err(), tv.err()].into_iter().flatten() {
                            warn!("provider directory fetch failed: {}", err);
                        }
                        Vec::new()
                    }
                }
            })
            .await
    }

    fn match_ids<'a>(
        &self,
        providers: impl Iterator<Item = &'a crate::models::WatchProvider>,
    ) -> Vec<u64> {
        let wanted: Vec<String> = self.allow_list.iter().map(|n| n.to_lowercase()).collect();
        let ids: BTreeSet<u64> = providers
            .filter(|p| {
                let name = p.provider_name.to_lowercase();
                wanted.iter().any(|w| name.contains(w.as_str()))
            })
            .map(|p| p.provider_id)
            .collect();
        ids.into_iter().collect()
    }

    /// Drops the memoized set so the next `resolve` refetches.
    pub fn clear(&mut self) {
        self.resolved.take();
    }
}
