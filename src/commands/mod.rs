// SPDX-License-Identifier: MIT

use anyhow::Result;

use crate::config::Config;
use crate::library::{JsonFileStore, Library};
use crate::models::{Page, Title};
use crate::providers::ProviderResolver;
use crate::tmdb::TmdbClient;

pub mod browse;
pub mod config;
pub mod ledger;
pub mod watch;

/// Everything a command needs for one session: configuration, the catalog
/// client (owning the request cache), the provider resolver, and the
/// watchlist/history ledger. Explicitly constructed and passed around; no
/// process-wide state.
pub struct App {
    pub config: Config,
    pub client: TmdbClient,
    pub resolver: ProviderResolver,
    pub library: Library<JsonFileStore>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = TmdbClient::new(&config.catalog)?;
        let resolver = ProviderResolver::new(config.providers.clone());
        let store = JsonFileStore::new(Config::ensure_config_dir()?.join("library"))?;
        let library = Library::open(store);
        Ok(Self {
            config,
            client,
            resolver,
            library,
        })
    }
}

pub(crate) fn print_title_line(title: &Title) {
    let rating = title
        .vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("  ★ {:.1}", v))
        .unwrap_or_default();
    let year = title.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    println!(
        "  {:>9}  [{}] {}{}{}",
        title.id,
        title.kind().as_path(),
        title.display_title(),
        year,
        rating
    );
}

pub(crate) fn print_page(heading: &str, page: &Page<Title>) {
    println!("{}", heading);
    if page.results.is_empty() {
        println!("  (no results)");
        return;
    }
    for title in page.results.iter().filter(|t| !t.is_person()) {
        print_title_line(title);
    }
    if page.total_pages > 1 {
        println!("  - page {} of {}", page.page.max(1), page.listed_pages());
    }
}
