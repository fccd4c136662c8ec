// SPDX-License-Identifier: MIT

use anyhow::Result;

use super::{App, print_page, print_title_line};
use crate::models::{self, MediaType};

/// Front page: trending plus provider-filtered movie and TV discovery,
/// fetched concurrently. A single failed fetch fails the whole page.
pub async fn home(app: &App, page: u32) -> Result<()> {
    let provider_ids = app.resolver.resolve(&app.client).await;
    let home = app.client.home(page, provider_ids).await?;

    if !app.library.history().is_empty() {
        println!("Continue watching");
        for entry in app.library.history().iter().take(6) {
            println!(
                "  {:>9}  [{}] {}",
                entry.id,
                entry.media_type.as_path(),
                entry.title
            );
        }
        println!();
    }

    print_page("Latest releases", &home.trending);
    println!();
    print_page("Popular movies", &home.movies);
    println!();
    print_page("Trending shows", &home.tv);
    Ok(())
}

pub async fn trending(app: &App, page: u32) -> Result<()> {
    let titles = app.client.trending(page).await?;
    print_page("Trending this week", &titles);
    Ok(())
}

pub async fn discover(app: &App, media: MediaType, page: u32, genre: Option<u64>) -> Result<()> {
    let provider_ids = app.resolver.resolve(&app.client).await;
    let extra = genre
        .map(|g| vec![("with_genres", g.to_string())])
        .unwrap_or_default();
    let titles = app.client.discover(media, page, provider_ids, &extra).await?;

    let heading = match media {
        MediaType::Movie => "Popular movies",
        MediaType::Tv => "Popular TV shows",
    };
    print_page(heading, &titles);
    Ok(())
}

pub async fn search(app: &App, query: &str, page: u32) -> Result<()> {
    let results = app.client.search_multi(query, page).await?;
    print_page(&format!("Results for \"{}\"", query), &results);
    Ok(())
}

pub async fn details(app: &App, media: MediaType, id: u64) -> Result<()> {
    let details = app.client.details(media, id).await?;

    let year = details.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    println!("{}{}", details.display_title(), year);
    if let Some(rating) = details.vote_average.filter(|v| *v > 0.0) {
        println!("  ★ {:.1}", rating);
    }
    if let Some(runtime) = details.runtime {
        println!("  {} min", runtime);
    }
    if let Some(seasons) = details.number_of_seasons {
        println!("  {} season{}", seasons, if seasons == 1 { "" } else { "s" });
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        println!("  {}", names.join(", "));
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        println!("\n{}", overview);
    }
    if let Some(poster) = details.poster_path.as_deref() {
        println!(
            "\nPoster: {}",
            models::image_url(&app.config.catalog.image_base, "w342", poster)
        );
    }

    let flatrate = details.flatrate_providers(app.client.region());
    if !flatrate.is_empty() {
        println!("\nAvailable on");
        for provider in flatrate {
            println!("  {}", provider.provider_name);
        }
    }

    if let Some(credits) = &details.credits {
        if !credits.cast.is_empty() {
            println!("\nCast");
            for member in credits.cast.iter().take(12) {
                match member.character.as_deref().filter(|c| !c.is_empty()) {
                    Some(character) => println!("  {} as {}", member.name, character),
                    None => println!("  {}", member.name),
                }
            }
        }
    }

    if let Some(similar) = &details.similar {
        if !similar.results.is_empty() {
            println!("\nSimilar titles");
            for title in similar.results.iter().take(12) {
                print_title_line(title);
            }
        }
    }

    Ok(())
}
